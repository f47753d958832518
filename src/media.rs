/// Slide media loading
///
/// Fetches encoded image bytes by URL and decodes them into pixel data for
/// the viewer and the thumbnail strip. Decoding happens eagerly so a broken
/// payload surfaces as a load failure instead of a blank widget.
use iced::widget::image::Handle;

/// A decoded image ready for display.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

/// Download and decode one image. Errors are already display strings; the
/// caller only ever forwards them.
pub async fn fetch_and_decode(http: reqwest::Client, url: String) -> Result<Decoded, String> {
    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|error| error.to_string())?
        .error_for_status()
        .map_err(|error| error.to_string())?;

    let bytes = response.bytes().await.map_err(|error| error.to_string())?;
    decode(&bytes)
}

/// Decode encoded image bytes into an iced handle.
pub fn decode(bytes: &[u8]) -> Result<Decoded, String> {
    let decoded = image::load_from_memory(bytes).map_err(|error| error.to_string())?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(Decoded {
        handle: Handle::from_rgba(width, height, rgba.into_raw()),
        width,
        height,
    })
}
