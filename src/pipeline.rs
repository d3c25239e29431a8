//! The batch job: fetch each listing page, extract chapels, geocode them.
//!
//! Everything runs strictly in sequence. Per-page and per-record failures
//! are logged and skipped, so a run always ends with whatever was collected.

use crate::geocode::Geocode;
use crate::models::ChapelRecord;
use crate::scrapers::{FetchPage, spotlight};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Fixed pauses that keep request rates polite towards third-party services.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Pause after each record's geocode call.
    pub per_record: Duration,
    /// Pause after each listing page, whether or not it could be fetched.
    pub per_page: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            per_record: Duration::from_secs(1),
            per_page: Duration::from_secs(2),
        }
    }
}

#[cfg(test)]
impl Pacing {
    pub fn none() -> Self {
        Self {
            per_record: Duration::ZERO,
            per_page: Duration::ZERO,
        }
    }
}

/// Scrape and geocode every chapel listed at `url`.
///
/// A page that cannot be fetched contributes no records.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn scrape_url<F, G>(
    fetcher: &F,
    geocoder: &G,
    url: &str,
    pacing: &Pacing,
) -> Vec<ChapelRecord>
where
    F: FetchPage,
    G: Geocode,
{
    info!("Scraping chapels");

    let html = match fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "Failed to fetch listing page");
            return Vec::new();
        }
    };

    let mut chapels = Vec::new();
    for chapel in spotlight::extract_chapels(&html) {
        let coordinates = match geocoder.locate(&chapel.name, &chapel.address).await {
            Ok(found) => found,
            Err(e) => {
                warn!(name = %chapel.name, error = %e, "Geocoding failed");
                None
            }
        };
        if coordinates.is_none() {
            warn!(name = %chapel.name, address = %chapel.address, "No coordinates found");
        }

        let chapel = chapel.located(coordinates);
        info!(name = %chapel.name, lat = ?chapel.latitude, lng = ?chapel.longitude, "Added chapel");
        chapels.push(chapel);

        sleep(pacing.per_record).await;
    }

    chapels
}

/// Run [`scrape_url`] over `urls` in order and collect all records.
#[instrument(level = "info", skip_all, fields(urls = urls.len()))]
pub async fn scrape_all<F, G>(
    fetcher: &F,
    geocoder: &G,
    urls: &[&str],
    pacing: &Pacing,
) -> Vec<ChapelRecord>
where
    F: FetchPage,
    G: Geocode,
{
    let mut all_chapels = Vec::new();

    for url in urls {
        let chapels = scrape_url(fetcher, geocoder, url, pacing).await;
        info!(%url, count = chapels.len(), "Finished listing page");
        all_chapels.extend(chapels);
        info!(total = all_chapels.len(), "Total chapels so far");

        sleep(pacing.per_page).await;
    }

    info!(total = all_chapels.len(), "Total chapels scraped");
    all_chapels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::FallbackGeocoder;
    use crate::geocode::stub::{Answer, NoGeocoder, StubGeocoder};
    use crate::models::Coordinates;
    use crate::scrapers::FetchError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves fixed pages; every other URL is a 404.
    struct StubFetcher {
        pages: HashMap<&'static str, &'static str>,
        requested: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn new(pages: &[(&'static str, &'static str)]) -> Self {
            Self {
                pages: pages.iter().copied().collect(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl FetchPage for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages
                .get(url)
                .map(|html| html.to_string())
                .ok_or(FetchError::Status(404))
        }
    }

    const PANAMA: &str = r#"
        <article class="spotlight-row">
          <h2 class="spotlight-row__title"> Capilla&nbsp;Cristo Rey </h2>
          <p class="address">
            <span class="address-line1">Vía Porras 12</span>
            <span class="locality">Ciudad de Panamá</span>
            <span class="country">Panamá</span>
          </p>
          <span class="spotlight-row__item-content">+507 6123 4567</span>
          <a class="spotlight-row__link" href="https://centroamerica.fsspx.org/es/cristo-rey">Más</a>
          <span class="spotlight-row__text--small">Domingo&#8195;9:00</span>
        </article>
    "#;

    const MEXICO: &str = r#"
        <article class="spotlight-row"><h2 class="spotlight-row__title">Capilla Guadalupe</h2></article>
        <article class="spotlight-row"><h2 class="spotlight-row__title">Capilla San Miguel</h2></article>
    "#;

    #[tokio::test]
    async fn test_end_to_end_single_chapel() {
        let fetcher = StubFetcher::new(&[("https://a.example/capillas", PANAMA)]);
        let geocoder = FallbackGeocoder::<NoGeocoder, _>::new(
            None,
            StubGeocoder::new(Answer::Found(8.99, -79.51)),
        );

        let chapels = scrape_all(
            &fetcher,
            &geocoder,
            &["https://a.example/capillas"],
            &Pacing::none(),
        )
        .await;

        assert_eq!(chapels.len(), 1);
        let chapel = &chapels[0];
        assert_eq!(chapel.name, "Capilla Cristo Rey");
        assert_eq!(chapel.address, "Vía Porras 12, Ciudad de Panamá, Panamá");
        assert_eq!(chapel.phone, "+50761234567");
        assert_eq!(chapel.website, "https://centroamerica.fsspx.org/es/cristo-rey");
        assert_eq!(chapel.comments, "Domingo 9:00");
        assert_eq!(chapel.coordinates(), Some(Coordinates::new(8.99, -79.51)));
    }

    #[tokio::test]
    async fn test_failed_page_does_not_halt_later_urls() {
        let fetcher = StubFetcher::new(&[
            ("https://a.example/capillas", PANAMA),
            ("https://c.example/capillas", MEXICO),
        ]);
        let geocoder = StubGeocoder::new(Answer::Empty);

        let chapels = scrape_all(
            &fetcher,
            &geocoder,
            &[
                "https://a.example/capillas",
                "https://missing.example/capillas",
                "https://c.example/capillas",
            ],
            &Pacing::none(),
        )
        .await;

        assert_eq!(fetcher.requested.borrow().len(), 3);
        let names: Vec<&str> = chapels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Capilla Cristo Rey", "Capilla Guadalupe", "Capilla San Miguel"]
        );
        assert!(chapels.iter().all(|c| c.coordinates().is_none()));
    }

    #[tokio::test]
    async fn test_failed_page_contributes_nothing() {
        let fetcher = StubFetcher::new(&[]);
        let geocoder = StubGeocoder::new(Answer::Found(1.0, 1.0));
        let chapels = scrape_url(&fetcher, &geocoder, "https://gone.example", &Pacing::none()).await;
        assert!(chapels.is_empty());
        assert_eq!(geocoder.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_geocoder_error_leaves_record_unlocated() {
        let fetcher = StubFetcher::new(&[("https://c.example/capillas", MEXICO)]);
        let geocoder = StubGeocoder::new(Answer::Fail);
        let chapels =
            scrape_url(&fetcher, &geocoder, "https://c.example/capillas", &Pacing::none()).await;
        assert_eq!(chapels.len(), 2);
        assert!(chapels.iter().all(|c| c.latitude.is_none() && c.longitude.is_none()));
        assert_eq!(geocoder.calls.get(), 2);
    }

    #[tokio::test]
    async fn test_geocoder_receives_name_and_address() {
        let fetcher = StubFetcher::new(&[("https://a.example/capillas", PANAMA)]);
        let geocoder = StubGeocoder::new(Answer::Empty);
        scrape_url(&fetcher, &geocoder, "https://a.example/capillas", &Pacing::none()).await;
        assert_eq!(
            geocoder.queries.borrow()[0],
            (
                "Capilla Cristo Rey".to_string(),
                "Vía Porras 12, Ciudad de Panamá, Panamá".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_all_pages_failing_yields_empty() {
        let fetcher = StubFetcher::new(&[]);
        let geocoder = StubGeocoder::new(Answer::Empty);
        let chapels = scrape_all(&fetcher, &geocoder, &["https://x.example", "https://y.example"], &Pacing::none()).await;
        assert!(chapels.is_empty());
    }

    #[test]
    fn test_default_pacing() {
        let pacing = Pacing::default();
        assert_eq!(pacing.per_record, Duration::from_secs(1));
        assert_eq!(pacing.per_page, Duration::from_secs(2));
    }
}
