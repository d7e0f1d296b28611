use contracts::dashboards::d100_candy_sales::{ViewDataResponse, ViewDescriptor};
use gloo_net::http::Request;

const API_BASE: &str = "/api/d100";

/// Fetch the catalog of analyses with their filter options.
pub async fn get_views() -> Result<Vec<ViewDescriptor>, String> {
    let url = format!("{}/views", API_BASE);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let data: Vec<ViewDescriptor> = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    Ok(data)
}

/// Fetch the render payload for one view.
///
/// `selected = None` omits the parameter (full selection); an empty
/// slice sends `selected=` so the server sees a deliberate empty set.
pub async fn get_view_data(
    view_id: &str,
    selected: Option<&[String]>,
) -> Result<ViewDataResponse, String> {
    let url = match selected {
        None => format!("{}/views/{}", API_BASE, view_id),
        Some(keys) => {
            let joined = keys
                .iter()
                .map(|k| urlencoding::encode(k).into_owned())
                .collect::<Vec<_>>()
                .join(",");
            format!("{}/views/{}?selected={}", API_BASE, view_id, joined)
        }
    };

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let data: ViewDataResponse = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    Ok(data)
}
