//! Translation between the dashed key names used by the metadata source and the underscored
//! field names used by the record model.

/// `container_title` -> `container-title`
pub fn to_dash(name: &str) -> String {
    name.replace('_', "-")
}

/// `container-title` -> `container_title`
pub fn from_dash(name: &str) -> String {
    name.replace('-', "_")
}
