use chrono::{Local, NaiveDateTime};

use mgm_model::SchemaRegistry;
use mgm_standards::Authorizer;

/// Everything a request needs besides its own input.
pub struct RequestContext<'a> {
    pub registry: &'a SchemaRegistry,
    pub authorizer: &'a dyn Authorizer,
    /// Timestamp used for export file names.
    pub now: NaiveDateTime,
}

impl<'a> RequestContext<'a> {
    pub fn new(registry: &'a SchemaRegistry, authorizer: &'a dyn Authorizer) -> Self {
        Self {
            registry,
            authorizer,
            now: Local::now().naive_local(),
        }
    }

    pub fn with_timestamp(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }
}
