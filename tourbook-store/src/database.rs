use mongodb::bson::{doc, Document};
use mongodb::{Client, ClientSession, Collection, Database};
use tourbook_core::CoreResult;
use tracing::info;

use crate::app_config::DatabaseConfig;
use crate::convert::store_err;

pub mod collections {
    pub const PACKAGES: &str = "tourPackages";
    pub const APPLICATIONS: &str = "tourGuideApplications";
    pub const GUIDES: &str = "tourGuides";
    pub const BOOKINGS: &str = "bookings";
    pub const PAYMENTS: &str = "paymentsCollection";
    pub const USERS: &str = "usersCollection";
    pub const ASSIGNED_TOURS: &str = "assignedToursCollection";
    pub const TOURIST_PROFILES: &str = "touristProfileInfoCollection";
    pub const ADMIN: &str = "adminCollection";
}

/// One pooled client for the process, opened at startup and shut down after
/// the HTTP server drains.
#[derive(Clone)]
pub struct DbClient {
    client: Client,
    db: Database,
    use_transactions: bool,
}

impl DbClient {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(&config.uri).await?;
        let db = client.database(&config.name);
        info!(
            database = %config.name,
            transactions = config.use_transactions,
            "MongoDB client created"
        );
        Ok(Self {
            client,
            db,
            use_transactions: config.use_transactions,
        })
    }

    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        info!("MongoDB ping succeeded");
        Ok(())
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }

    pub fn packages(&self) -> Collection<Document> {
        self.collection(collections::PACKAGES)
    }

    pub fn applications(&self) -> Collection<Document> {
        self.collection(collections::APPLICATIONS)
    }

    pub fn guides(&self) -> Collection<Document> {
        self.collection(collections::GUIDES)
    }

    pub fn bookings(&self) -> Collection<Document> {
        self.collection(collections::BOOKINGS)
    }

    pub fn payments(&self) -> Collection<Document> {
        self.collection(collections::PAYMENTS)
    }

    pub fn users(&self) -> Collection<Document> {
        self.collection(collections::USERS)
    }

    pub fn assigned_tours(&self) -> Collection<Document> {
        self.collection(collections::ASSIGNED_TOURS)
    }

    pub fn tourist_profiles(&self) -> Collection<Document> {
        self.collection(collections::TOURIST_PROFILES)
    }

    pub fn admins(&self) -> Collection<Document> {
        self.collection(collections::ADMIN)
    }

    /// Start a session for a multi-step write. Dropping the session without
    /// [`DbClient::commit`] aborts an open transaction.
    pub async fn begin(&self) -> CoreResult<ClientSession> {
        let mut session = self.client.start_session().await.map_err(store_err)?;
        if self.use_transactions {
            session.start_transaction().await.map_err(store_err)?;
        }
        Ok(session)
    }

    pub async fn commit(&self, mut session: ClientSession) -> CoreResult<()> {
        if self.use_transactions {
            session.commit_transaction().await.map_err(store_err)?;
        }
        Ok(())
    }

    pub async fn shutdown(self) {
        info!("Closing MongoDB client...");
        self.client.shutdown().await;
    }
}
