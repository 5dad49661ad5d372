//! WebDriver-backed [`Browser`] implementation.

use std::path::Path;

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;

use crate::browser::Browser;
use crate::error::ScraperError;

const SCROLL_HEIGHT_SCRIPT: &str = "return arguments[0].scrollHeight";
const SCROLL_TO_BOTTOM_SCRIPT: &str = "arguments[0].scrollTop = arguments[0].scrollHeight";

// Clicks go through script execution rather than the WebDriver click
// endpoint: the reviews toggle is frequently overlaid by cookie banners and
// the endpoint refuses obscured elements.
const CLICK_SCRIPT: &str = "arguments[0].click()";

/// A live Chrome session speaking the WebDriver protocol via `fantoccini`.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Connect to a running chromedriver at `webdriver_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Session`] if the session cannot be created
    /// (driver not running, capability mismatch).
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, ScraperError> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--window-size=1920,1080".to_string(),
        ];
        if headless {
            args.push("--headless=new".to_string());
            args.push("--disable-gpu".to_string());
        }

        let mut caps = serde_json::Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        tracing::debug!(webdriver_url, headless, "connecting to WebDriver");
        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;

        Ok(Self { client })
    }

    async fn execute_on(
        &self,
        script: &str,
        element: &Element,
    ) -> Result<serde_json::Value, ScraperError> {
        let reference = serde_json::to_value(element)?;
        Ok(self.client.execute(script, vec![reference]).await?)
    }
}

#[async_trait]
impl Browser for WebDriverSession {
    type Handle = Element;

    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn find_all(
        &mut self,
        root: Option<&Self::Handle>,
        selector: &str,
    ) -> Result<Vec<Self::Handle>, ScraperError> {
        let elements = match root {
            Some(scope) => scope.find_all(Locator::Css(selector)).await?,
            None => self.client.find_all(Locator::Css(selector)).await?,
        };
        Ok(elements)
    }

    async fn click(&mut self, element: &Self::Handle) -> Result<(), ScraperError> {
        self.execute_on(CLICK_SCRIPT, element).await?;
        Ok(())
    }

    async fn text(&mut self, element: &Self::Handle) -> Result<String, ScraperError> {
        Ok(element.text().await?)
    }

    async fn scroll_height(&mut self, element: &Self::Handle) -> Result<i64, ScraperError> {
        let value = self.execute_on(SCROLL_HEIGHT_SCRIPT, element).await?;
        value
            .as_i64()
            .ok_or_else(|| ScraperError::UnexpectedScriptValue {
                script: SCROLL_HEIGHT_SCRIPT.to_string(),
                value: value.to_string(),
            })
    }

    async fn scroll_to_bottom(&mut self, element: &Self::Handle) -> Result<(), ScraperError> {
        self.execute_on(SCROLL_TO_BOTTOM_SCRIPT, element).await?;
        Ok(())
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), ScraperError> {
        let png = self.client.screenshot().await?;
        std::fs::write(path, png).map_err(|e| ScraperError::Screenshot {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn id_of(&self, element: &Self::Handle) -> String {
        // The W3C wire form of an element is a single-entry object keyed by
        // the element-reference constant; the value is the session-unique id.
        serde_json::to_value(element)
            .ok()
            .and_then(|value| {
                value.as_object().and_then(|object| {
                    object
                        .values()
                        .next()
                        .and_then(|id| id.as_str().map(str::to_owned))
                })
            })
            .unwrap_or_else(|| format!("{element:?}"))
    }

    async fn close(self) -> Result<(), ScraperError> {
        self.client.close().await?;
        Ok(())
    }
}
