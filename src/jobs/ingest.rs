use chrono::Utc;
use uuid::Uuid;

use crate::{
    assets::{decode::decode_image, store::AssetStore},
    foundation::error::{MockpressError, MockpressResult},
    naming::{file_stem, sanitize_filename},
    store::{
        api::{DesignStore, MockupStore},
        model::{Design, Mockup},
    },
};

const MOCKUP_NAME_MAX: usize = 150;
const DESIGN_NAME_MAX: usize = 120;

/// Store an uploaded mockup image and register it with the default design area.
///
/// `name` defaults to the uploaded file name.
#[tracing::instrument(skip(mockups, assets, bytes), fields(len = bytes.len()))]
pub fn ingest_mockup(
    mockups: &dyn MockupStore,
    assets: &dyn AssetStore,
    uploads_dir: &str,
    file_name: &str,
    name: Option<&str>,
    bytes: &[u8],
) -> MockpressResult<Mockup> {
    check_image(file_name, bytes)?;

    let token = Utc::now().timestamp_millis().to_string();
    let stored = sanitize_filename(file_name, MOCKUP_NAME_MAX, &token);
    let url = store_upload(assets, uploads_dir, "mockups", &stored, bytes)?;

    let display = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or(file_name);
    let mockup = Mockup::new(display, url);
    mockups.insert_mockup(mockup.clone())?;
    tracing::info!(id = %mockup.id, url = %mockup.image_url, "ingested mockup");
    Ok(mockup)
}

/// Store an uploaded design image; the design is named after the file stem.
#[tracing::instrument(skip(designs, assets, bytes), fields(len = bytes.len()))]
pub fn ingest_design(
    designs: &dyn DesignStore,
    assets: &dyn AssetStore,
    uploads_dir: &str,
    file_name: &str,
    bytes: &[u8],
) -> MockpressResult<Design> {
    check_image(file_name, bytes)?;

    let random = Uuid::new_v4().simple().to_string();
    let token = format!("{}-{}", Utc::now().timestamp_millis(), &random[..6]);
    let stored = sanitize_filename(file_name, DESIGN_NAME_MAX, &token);
    let url = store_upload(assets, uploads_dir, "designs", &stored, bytes)?;

    let design = Design::new(file_stem(file_name), url);
    designs.insert_design(design.clone())?;
    tracing::info!(id = %design.id, url = %design.image_url, "ingested design");
    Ok(design)
}

fn check_image(file_name: &str, bytes: &[u8]) -> MockpressResult<()> {
    if bytes.is_empty() {
        return Err(MockpressError::validation(format!(
            "uploaded file '{file_name}' is empty"
        )));
    }
    decode_image(bytes)?;
    Ok(())
}

fn store_upload(
    assets: &dyn AssetStore,
    uploads_dir: &str,
    kind: &str,
    stored_name: &str,
    bytes: &[u8],
) -> MockpressResult<String> {
    let url = assets.url_for(&format!("{uploads_dir}/{kind}/{stored_name}"))?;
    let path = assets.resolve(&url)?;
    assets.write(&path, bytes)?;
    Ok(url)
}

#[cfg(test)]
#[path = "../../tests/unit/jobs/ingest.rs"]
mod tests;
