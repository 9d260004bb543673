//! Province and language browsing.
//!
//! Backs the landing grid (a short list of provinces with a "view all"
//! toggle) and the province detail page (its languages, fun facts and the
//! link into the quiz).

use serde::Serialize;

use crate::carousel::ViewportClass;
use crate::error::{CoreError, Result};
use crate::gateway::{DataGateway, LanguageFilter};
use crate::model::{FunFact, Language, Province};
use crate::quiz::QuizParams;

/// Viewports narrower than this show the narrow province grid.
pub const PROVINCE_GRID_BREAKPOINT_PX: f64 = 1024.0;

/// Path of the quiz page the detail page links to.
pub const QUIZ_PAGE_PATH: &str = "/pages/quizPage.html";

const NARROW_PAGE_SIZE: usize = 9;
const WIDE_PAGE_SIZE: usize = 8;

pub fn page_size(viewport: ViewportClass) -> usize {
    match viewport {
        ViewportClass::Narrow => NARROW_PAGE_SIZE,
        ViewportClass::Wide => WIDE_PAGE_SIZE,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvincePage {
    pub provinces: Vec<Province>,
    pub total: usize,
    /// Whether the "view all" toggle should be offered at all.
    pub has_more: bool,
    pub showing_all: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvinceDetail {
    pub province: Province,
    pub languages: Vec<Language>,
    pub fun_facts: Vec<FunFact>,
}

impl ProvinceDetail {
    pub fn language_heading(&self) -> String {
        format!("Bahasa di Provinsi {}", self.province.name)
    }

    pub fn fun_fact_heading(&self) -> String {
        format!("Fakta Menarik Provinsi {}", self.province.name)
    }
}

pub struct Catalog<'a> {
    gateway: &'a dyn DataGateway,
}

impl<'a> Catalog<'a> {
    pub fn new(gateway: &'a dyn DataGateway) -> Self {
        Self { gateway }
    }

    pub async fn provinces_page(&self, show_all: bool, viewport: ViewportClass) -> Result<ProvincePage> {
        let provinces = self.gateway.provinces().await?;
        let total = provinces.len();
        let limit = page_size(viewport);
        let provinces = if show_all {
            provinces
        } else {
            provinces.into_iter().take(limit).collect()
        };
        Ok(ProvincePage {
            provinces,
            total,
            has_more: total > limit,
            showing_all: show_all,
        })
    }

    pub async fn province(&self, id: &str) -> Result<Province> {
        self.gateway
            .provinces()
            .await?
            .into_iter()
            .find(|p| p.id == id || p.slug.as_deref() == Some(id))
            .ok_or_else(|| CoreError::not_found("province", id))
    }

    /// Languages spoken in a province. Falls back to the languages embedded in
    /// the province entry when the filtered listing is empty.
    pub async fn languages_of(&self, province_id: &str) -> Result<Vec<Language>> {
        let province = self.province(province_id).await?;
        let languages: Vec<Language> = self
            .gateway
            .languages(LanguageFilter::Province(province.id.clone()))
            .await?
            .into_iter()
            .filter(|l| l.province_id.as_deref().map_or(true, |id| id == province.id))
            .collect();
        if languages.is_empty() {
            tracing::debug!(province_id = %province.id, "using embedded province languages");
            return Ok(province.languages);
        }
        Ok(languages)
    }

    pub async fn province_detail(&self, id: &str) -> Result<ProvinceDetail> {
        let province = self.province(id).await?;
        let languages = self.languages_of(&province.id).await?;
        Ok(ProvinceDetail {
            fun_facts: province.fun_facts.clone(),
            languages,
            province,
        })
    }
}

/// Link from a province detail page into the quiz for one of its languages.
pub fn quiz_link(language_id: &str, province_id: &str) -> String {
    format!(
        "{QUIZ_PAGE_PATH}?{}",
        QuizParams::new(language_id, province_id).to_query()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::StaticGateway;

    fn many_provinces(n: usize) -> StaticGateway {
        let mut gateway = StaticGateway::builtin();
        gateway.provinces = (1..=n)
            .map(|i| Province {
                id: i.to_string(),
                name: format!("Provinsi {i}"),
                slug: None,
                languages: Vec::new(),
                fun_facts: Vec::new(),
            })
            .collect();
        gateway
    }

    #[tokio::test]
    async fn page_is_limited_per_viewport() {
        let gateway = many_provinces(12);
        let catalog = Catalog::new(&gateway);

        let wide = catalog.provinces_page(false, ViewportClass::Wide).await.unwrap();
        assert_eq!(wide.provinces.len(), 8);
        assert!(wide.has_more);

        let narrow = catalog.provinces_page(false, ViewportClass::Narrow).await.unwrap();
        assert_eq!(narrow.provinces.len(), 9);

        let all = catalog.provinces_page(true, ViewportClass::Wide).await.unwrap();
        assert_eq!(all.provinces.len(), 12);
        assert_eq!(all.total, 12);
    }

    #[tokio::test]
    async fn short_list_hides_toggle() {
        let gateway = many_provinces(8);
        let page = Catalog::new(&gateway)
            .provinces_page(false, ViewportClass::Wide)
            .await
            .unwrap();
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn unknown_province_is_not_found() {
        let gateway = StaticGateway::builtin();
        let err = Catalog::new(&gateway).province("99").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn province_resolves_by_slug() {
        let gateway = StaticGateway::builtin();
        let detail = Catalog::new(&gateway)
            .province_detail("jawa-timur")
            .await
            .unwrap();
        assert_eq!(detail.province.id, "1");
        assert_eq!(detail.languages.len(), 1);
        assert_eq!(detail.language_heading(), "Bahasa di Provinsi Jawa Timur");
    }

    #[test]
    fn quiz_link_uses_canonical_params() {
        assert_eq!(
            quiz_link("3", "1"),
            "/pages/quizPage.html?language=3&province=1"
        );
    }
}
