use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Projects {
    Table,
    OwnerId,
    Status,
}

#[derive(DeriveIden)]
enum Applications {
    Table,
    ProjectId,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum Ratings {
    Table,
    RatedUserId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on projects.owner_id for the my-projects listing
        manager
            .create_index(
                Index::create()
                    .name("idx_projects_owner_id")
                    .table(Projects::Table)
                    .col(Projects::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Index on projects.status for the open-project listing
        manager
            .create_index(
                Index::create()
                    .name("idx_projects_status")
                    .table(Projects::Table)
                    .col(Projects::Status)
                    .to_owned(),
            )
            .await?;

        // Index on applications.project_id for the owner's review list
        manager
            .create_index(
                Index::create()
                    .name("idx_applications_project_id")
                    .table(Applications::Table)
                    .col(Applications::ProjectId)
                    .to_owned(),
            )
            .await?;

        // Index on teams.user_id for the my-memberships listing
        manager
            .create_index(
                Index::create()
                    .name("idx_teams_user_id")
                    .table(Teams::Table)
                    .col(Teams::UserId)
                    .to_owned(),
            )
            .await?;

        // Index on ratings.rated_user_id for the profile aggregate
        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_rated_user_id")
                    .table(Ratings::Table)
                    .col(Ratings::RatedUserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_projects_owner_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_projects_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_applications_project_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_teams_user_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_ratings_rated_user_id").to_owned())
            .await?;

        Ok(())
    }
}
