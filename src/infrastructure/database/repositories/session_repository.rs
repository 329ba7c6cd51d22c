use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::record_table::{db_err, read_with_retry};
use crate::domain::{DeviceSession, DomainResult, SessionRepository};
use crate::infrastructure::database::entities::device_session_details;

pub struct SeaOrmSessionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: device_session_details::Model) -> DeviceSession {
    DeviceSession {
        session_id: m.session_id,
        charger_id: m.charger_id,
        user: m.user,
        start_time: m.start_time,
        stop_time: m.stop_time,
        unit_consumed: m.unit_consumed,
        price: m.price,
    }
}

#[async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn find_by_chargers(&self, charger_ids: &[String]) -> DomainResult<Vec<DeviceSession>> {
        if charger_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = device_session_details::Entity::find()
            .filter(device_session_details::Column::ChargerId.is_in(charger_ids.iter().cloned()))
            .order_by_asc(device_session_details::Column::SessionId);
        let db = &self.db;
        let models = read_with_retry("device_session", || {
            let query = query.clone();
            async move { query.all(db).await.map_err(db_err) }
        })
        .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
