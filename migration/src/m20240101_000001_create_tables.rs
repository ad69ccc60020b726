use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Artists are keyed on their exact credited name
        manager
            .create_table(
                Table::create()
                    .table(Artist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Artist::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Artist::Name).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Artist::CreatedAt)
                            .integer()
                            .not_null()
                            .default(Expr::cust("(strftime('%s', 'now'))")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CachedTrack::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CachedTrack::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CachedTrack::Title).string().not_null())
                    .col(ColumnDef::new(CachedTrack::YoutubeId).string().not_null())
                    .col(
                        ColumnDef::new(CachedTrack::UploadCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CachedTrack::CreatedAt)
                            .integer()
                            .not_null()
                            .default(Expr::cust("(strftime('%s', 'now'))")),
                    )
                    .col(
                        ColumnDef::new(CachedTrack::UpdatedAt)
                            .integer()
                            .not_null()
                            .default(Expr::cust("(strftime('%s', 'now'))")),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per credit, so the same artist may be credited twice on a track
        manager
            .create_table(
                Table::create()
                    .table(CachedTrackArtist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CachedTrackArtist::CachedTrackId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CachedTrackArtist::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CachedTrackArtist::ArtistId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CachedTrackArtist::CachedTrackId)
                            .col(CachedTrackArtist::Position),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cached_track_artist_cached_track_id")
                            .from(CachedTrackArtist::Table, CachedTrackArtist::CachedTrackId)
                            .to(CachedTrack::Table, CachedTrack::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cached_track_artist_artist_id")
                            .from(CachedTrackArtist::Table, CachedTrackArtist::ArtistId)
                            .to(Artist::Table, Artist::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cached_track_title")
                    .table(CachedTrack::Table)
                    .col(CachedTrack::Title)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cached_track_artist_artist_id")
                    .table(CachedTrackArtist::Table)
                    .col(CachedTrackArtist::ArtistId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CachedTrackArtist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CachedTrack::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Artist::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Artist {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CachedTrack {
    Table,
    Id,
    Title,
    YoutubeId,
    UploadCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CachedTrackArtist {
    Table,
    CachedTrackId,
    Position,
    ArtistId,
}
