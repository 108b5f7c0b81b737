pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users_table;
mod m20250601_000002_create_skills_table;
mod m20250601_000003_create_user_skills_table;
mod m20250601_000004_create_projects_table;
mod m20250601_000005_create_project_skills_table;
mod m20250601_000006_create_applications_table;
mod m20250601_000007_create_teams_table;
mod m20250601_000008_create_ratings_table;
mod m20250615_000001_add_workflow_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users_table::Migration),
            Box::new(m20250601_000002_create_skills_table::Migration),
            Box::new(m20250601_000003_create_user_skills_table::Migration),
            Box::new(m20250601_000004_create_projects_table::Migration),
            Box::new(m20250601_000005_create_project_skills_table::Migration),
            Box::new(m20250601_000006_create_applications_table::Migration),
            Box::new(m20250601_000007_create_teams_table::Migration),
            Box::new(m20250601_000008_create_ratings_table::Migration),
            Box::new(m20250615_000001_add_workflow_indexes::Migration),
        ]
    }
}
