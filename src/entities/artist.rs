use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "artist")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cached_track_artist::Entity")]
    CachedTrackArtist,
}

impl Related<super::cached_track_artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CachedTrackArtist.def()
    }
}

impl Related<super::cached_track::Entity> for Entity {
    fn to() -> RelationDef {
        super::cached_track_artist::Relation::CachedTrack.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::cached_track_artist::Relation::Artist.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            created_at: Set(chrono::Utc::now().timestamp()),
            ..ActiveModelTrait::default()
        }
    }
}
