mod employee;

use std::sync::Arc;

use async_graphql::{
    Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object, Schema, SimpleObject,
};
use platform_api::internal_error;
use platform_authz::Role;
use products_hr::EmployeeService;
use tracing::instrument;

use crate::directory::fetch_employee;
pub use employee::EmployeePayload;

pub type SchemaType = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// The caller's [`Role`] travels as request data; absent means [`Role::None`].
pub fn build_schema(service: Arc<dyn EmployeeService>) -> SchemaType {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(service)
        .finish()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> HealthPayload {
        HealthPayload { ok: true }
    }

    /// Directory entry filtered by the caller's role.
    #[instrument(name = "graphql.employee", skip(self, ctx))]
    async fn employee(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<EmployeePayload> {
        let service = ctx
            .data::<Arc<dyn EmployeeService>>()
            .map_err(|err| internal_error(anyhow::anyhow!(err.message)))?;
        let role = ctx.data_opt::<Role>().copied().unwrap_or_default();
        fetch_employee(service.as_ref(), &id, role)
            .map(EmployeePayload::from)
            .map_err(|err| err.extend())
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct HealthPayload {
    pub ok: bool,
}
