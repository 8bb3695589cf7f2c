//! Project entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub role: String,
    pub tools: Vec<String>,
    #[sea_orm(column_type = "Text")]
    pub summary: String,
    #[sea_orm(column_type = "Text")]
    pub outcome: String,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for folio_core::domain::Project {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            role: model.role,
            tools: model.tools,
            summary: model.summary,
            outcome: model.outcome,
            image_url: model.image_url,
            github_url: model.github_url,
            live_url: model.live_url,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<folio_core::domain::Project> for ActiveModel {
    fn from(project: folio_core::domain::Project) -> Self {
        Self {
            id: Set(project.id),
            title: Set(project.title),
            description: Set(project.description),
            role: Set(project.role),
            tools: Set(project.tools),
            summary: Set(project.summary),
            outcome: Set(project.outcome),
            image_url: Set(project.image_url),
            github_url: Set(project.github_url),
            live_url: Set(project.live_url),
            created_at: Set(project.created_at.into()),
            updated_at: Set(project.updated_at.into()),
        }
    }
}
