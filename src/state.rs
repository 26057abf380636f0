use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
    mail::Mailer,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub mailer: Mailer,
    pub config: AppConfig,
}
