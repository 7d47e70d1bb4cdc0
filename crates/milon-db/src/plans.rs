use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use milon_data::{
    Delete,
    Insert,
    Plan,
    PlanFilter,
    Query,
    Retrieve,
    Update,
};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<Plan> for Connection {
    type Filter = PlanFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Plan>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::new(
            r#"
            SELECT
                id,
                name,
                ROUND(price, 10) AS price,
                duration_days
            FROM plans
            WHERE 1
            "#,
        );

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(name) = filter.name.clone() {
            qry.push(" AND name LIKE ").push_bind(format!("%{}%", name));
        }

        let plans: Vec<Plan> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(plans)
    }
}

#[async_trait]
impl Retrieve<Plan> for Connection {
    type Key = u32;
    async fn retrieve(&self, plan_id: Self::Key) -> Result<Plan> {
        let filter = PlanFilter {
            id: Some(plan_id),
            ..Default::default()
        };
        let plan = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(plan)
    }
}

#[async_trait]
impl Insert<Plan> for Connection {
    async fn insert(&self, plan: Plan) -> Result<Plan> {
        let insert: Id<u32> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO plans (
                    name,
                    price,
                    duration_days
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(&plan.name)
                .push_bind(plan.price)
                .push_bind(plan.duration_days);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<Plan> for Connection {
    /// Update plan
    async fn update(&self, plan: Plan) -> Result<Plan> {
        {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("UPDATE plans SET")
                .push(" name = ")
                .push_bind(&plan.name)
                .push(", price = ")
                .push_bind(plan.price)
                .push(", duration_days = ")
                .push_bind(plan.duration_days)
                .push(" WHERE id = ")
                .push_bind(plan.id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(plan.id).await
    }
}

#[async_trait]
impl Delete<Plan> for Connection {
    /// Delete plan
    async fn delete(&self, plan: Plan) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM plans WHERE id = ")
            .push_bind(plan.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
