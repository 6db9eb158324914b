pub mod asset;
pub mod demo;
pub mod entity;
pub mod mission;

pub use asset::{Asset, AssetType, Assignment};
pub use entity::{Entity, EntityCategory, MeshLink, ProjectEntity};
pub use mission::{
    MeshImport, Mission, MissionConstraints, MissionImports, MissionMeta, Phase,
};
