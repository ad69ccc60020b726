use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "cached_track_artist")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub cached_track_id: i64,
    /// Zero-based credit order of the artist on the track.
    #[sea_orm(primary_key, auto_increment = false)]
    pub position: i32,
    pub artist_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cached_track::Entity",
        from = "Column::CachedTrackId",
        to = "super::cached_track::Column::Id",
        on_delete = "Cascade"
    )]
    CachedTrack,
    #[sea_orm(
        belongs_to = "super::artist::Entity",
        from = "Column::ArtistId",
        to = "super::artist::Column::Id",
        on_delete = "Cascade"
    )]
    Artist,
}

impl Related<super::cached_track::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CachedTrack.def()
    }
}

impl Related<super::artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
