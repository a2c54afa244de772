//! Favorites tools.

use crate::format::format_favorites;
use crate::service::CuraLink;
use crate::store::KeyValueStore;
use crate::types::{EntityKind, ItemId, Role};
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ToggleFavoriteRequest {
    /// Whose favorites to change
    pub role: Role,
    /// Kind of item: trial, expert, publication, forum_post or collaborator
    pub kind: EntityKind,
    /// Item id as shown in match listings
    pub id: ItemId,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFavoritesRequest {
    /// Whose favorites to list
    pub role: Role,
}

pub fn handle_toggle_favorite<S: KeyValueStore>(
    engine: &CuraLink<S>,
    request: &ToggleFavoriteRequest,
) -> Result<String, String> {
    let now_favorite = engine
        .state()
        .toggle_favorite(request.role, request.kind, request.id)
        .map_err(|e| format!("Failed to update favorites: {}", e))?;

    Ok(if now_favorite {
        format!("Added {} #{} to {} favorites.", request.kind, request.id, request.role.as_str())
    } else {
        format!(
            "Removed {} #{} from {} favorites.",
            request.kind,
            request.id,
            request.role.as_str()
        )
    })
}

pub fn handle_list_favorites<S: KeyValueStore>(
    engine: &CuraLink<S>,
    request: &ListFavoritesRequest,
) -> String {
    format_favorites(&engine.state().favorites(request.role))
}
