//! # Entry Collection Module
//!
//! Orchestrates the resource providers and the entry builder into the full
//! ordered entry list for one generation run. The order is fixed: the fixed
//! system pages first, then feature-gated pages, then the catalog fan-out
//! (each kind behind its own toggle), then sitemap-flagged topics, then the
//! custom URLs from configuration. Within each resource kind the provider's
//! native ordering is preserved; the collector never re-sorts.
//!
//! Provider failures are fatal and abort the run; a single resource whose
//! canonical route cannot be resolved is skipped with a log line instead.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::core::config::SitemapConfig;
use crate::core::error::Result;
use crate::core::traits::{
    CatalogRecord, ResourceCatalog, ResourceKind, RouteResolver,
    SlugResolver,
};
use crate::entry::{EntryBuilder, SitemapEntry, UpdateFrequency};
use crate::locale::Locale;

/// Route name of the home page.
pub const ROUTE_HOME_PAGE: &str = "HomePage";
/// Route name of the product search page.
pub const ROUTE_PRODUCT_SEARCH: &str = "ProductSearch";
/// Route name of the contact page.
pub const ROUTE_CONTACT_US: &str = "ContactUs";
/// Route name of the news archive page.
pub const ROUTE_NEWS_ARCHIVE: &str = "NewsArchive";
/// Route name of the blog index page.
pub const ROUTE_BLOG: &str = "Blog";
/// Route name of the forum boards page.
pub const ROUTE_BOARDS: &str = "Boards";
/// Route name of a category page.
pub const ROUTE_CATEGORY: &str = "Category";
/// Route name of a manufacturer page.
pub const ROUTE_MANUFACTURER: &str = "Manufacturer";
/// Route name of a product page.
pub const ROUTE_PRODUCT: &str = "Product";
/// Route name of a products-by-tag page.
pub const ROUTE_PRODUCTS_BY_TAG: &str = "ProductsByTag";
/// Route name of a topic page.
pub const ROUTE_TOPIC: &str = "Topic";
/// Route name used to address one numbered sitemap shard.
pub const ROUTE_SITEMAP_SHARD: &str = "sitemap-indexed.xml";

/// Collects the full ordered [`SitemapEntry`] list for one generation run.
#[derive(Debug)]
pub struct EntryCollector<'a> {
    config: &'a SitemapConfig,
    routes: &'a dyn RouteResolver,
    catalog: &'a dyn ResourceCatalog,
    slugs: &'a dyn SlugResolver,
}

impl<'a> EntryCollector<'a> {
    /// Creates a collector over the given configuration and capabilities.
    pub fn new(
        config: &'a SitemapConfig,
        routes: &'a dyn RouteResolver,
        catalog: &'a dyn ResourceCatalog,
        slugs: &'a dyn SlugResolver,
    ) -> Self {
        Self {
            config,
            routes,
            catalog,
            slugs,
        }
    }

    /// Produces the complete ordered entry list.
    ///
    /// `locales` is `None` when locale-aware URLs are disabled site-wide; no
    /// entry carries alternates in that case.
    pub fn collect_all(
        &self,
        locales: Option<&[Locale]>,
    ) -> Result<Vec<SitemapEntry>> {
        let builder = EntryBuilder::new(
            self.routes,
            &self.config.path_base,
            self.config.scheme(),
        );
        let now = Utc::now();
        let mut entries = Vec::new();

        // Fixed system pages, always included.
        for route in
            [ROUTE_HOME_PAGE, ROUTE_PRODUCT_SEARCH, ROUTE_CONTACT_US]
        {
            self.push_page(&builder, &mut entries, route, locales, now);
        }

        // Feature-gated fixed pages.
        if self.config.news_enabled {
            self.push_page(
                &builder,
                &mut entries,
                ROUTE_NEWS_ARCHIVE,
                locales,
                now,
            );
        }
        if self.config.blog_enabled {
            self.push_page(&builder, &mut entries, ROUTE_BLOG, locales, now);
        }
        if self.config.forums_enabled {
            self.push_page(&builder, &mut entries, ROUTE_BOARDS, locales, now);
        }

        // Catalog fan-out, each kind behind its own toggle.
        if self.config.include_categories {
            let records = self.catalog.categories(self.config.store_id)?;
            debug!("Collected {} categories", records.len());
            self.push_resources(
                &builder,
                &mut entries,
                ROUTE_CATEGORY,
                ResourceKind::Category,
                records,
                locales,
                now,
            );
        }
        if self.config.include_manufacturers {
            let records = self.catalog.manufacturers(self.config.store_id)?;
            debug!("Collected {} manufacturers", records.len());
            self.push_resources(
                &builder,
                &mut entries,
                ROUTE_MANUFACTURER,
                ResourceKind::Manufacturer,
                records,
                locales,
                now,
            );
        }
        if self.config.include_products {
            let records =
                self.catalog.visible_products(self.config.store_id)?;
            debug!("Collected {} products", records.len());
            self.push_resources(
                &builder,
                &mut entries,
                ROUTE_PRODUCT,
                ResourceKind::Product,
                records,
                locales,
                now,
            );
        }
        if self.config.include_product_tags {
            let records = self.catalog.product_tags()?;
            debug!("Collected {} product tags", records.len());
            self.push_resources(
                &builder,
                &mut entries,
                ROUTE_PRODUCTS_BY_TAG,
                ResourceKind::ProductTag,
                records,
                locales,
                now,
            );
        }

        // Topics flagged for sitemap inclusion, always consulted.
        let topics = self.catalog.sitemap_topics(self.config.store_id)?;
        debug!("Collected {} topics", topics.len());
        self.push_resources(
            &builder,
            &mut entries,
            ROUTE_TOPIC,
            ResourceKind::Topic,
            topics,
            locales,
            now,
        );

        // Custom URLs from configuration: fixed locations, no localization.
        let store_location =
            self.routes.store_location(self.config.scheme());
        for custom_url in &self.config.custom_urls {
            entries.push(SitemapEntry::new(
                join_url(&store_location, custom_url),
                Vec::new(),
                UpdateFrequency::Weekly,
                now,
            ));
        }

        info!("Collected {} sitemap entries", entries.len());
        Ok(entries)
    }

    /// Appends one fixed-page entry, skipping the page when its route cannot
    /// be resolved.
    fn push_page(
        &self,
        builder: &EntryBuilder<'_>,
        entries: &mut Vec<SitemapEntry>,
        route: &str,
        locales: Option<&[Locale]>,
        now: DateTime<Utc>,
    ) {
        match builder.build(route, None, locales, now, UpdateFrequency::Weekly)
        {
            Some(entry) => entries.push(entry),
            None => warn!("Route `{}` did not resolve; page skipped", route),
        }
    }

    /// Appends one entry per catalog record, resolving localized slugs
    /// through the slug capability.
    #[allow(clippy::too_many_arguments)]
    fn push_resources(
        &self,
        builder: &EntryBuilder<'_>,
        entries: &mut Vec<SitemapEntry>,
        route: &str,
        kind: ResourceKind,
        records: Vec<CatalogRecord>,
        locales: Option<&[Locale]>,
        now: DateTime<Utc>,
    ) {
        for record in records {
            let params = |locale| {
                crate::core::traits::RouteParams::with_slug(
                    self.slugs.seo_slug(kind, record.id, locale),
                )
            };
            let updated_on = record.updated_on.unwrap_or(now);
            match builder.build(
                route,
                Some(&params),
                locales,
                updated_on,
                UpdateFrequency::Weekly,
            ) {
                Some(entry) => entries.push(entry),
                None => warn!(
                    "Route `{}` did not resolve for {:?} {}; resource skipped",
                    route, kind, record.id
                ),
            }
        }
    }
}

/// Joins the store location and a custom URL with exactly one slash.
fn join_url(store_location: &str, custom_url: &str) -> String {
    format!(
        "{}/{}",
        store_location.trim_end_matches('/'),
        custom_url.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{RouteParams, Scheme, StoreId};
    use crate::locale::LocaleId;

    #[derive(Debug)]
    struct FakeRoutes;

    impl RouteResolver for FakeRoutes {
        fn route_url(
            &self,
            route_name: &str,
            params: Option<&RouteParams>,
            scheme: Scheme,
        ) -> Option<String> {
            let path = match route_name {
                ROUTE_HOME_PAGE => "/".to_string(),
                ROUTE_PRODUCT_SEARCH => "/search".to_string(),
                ROUTE_CONTACT_US => "/contactus".to_string(),
                ROUTE_NEWS_ARCHIVE => "/news".to_string(),
                ROUTE_BLOG => "/blog".to_string(),
                ROUTE_BOARDS => "/boards".to_string(),
                ROUTE_CATEGORY | ROUTE_MANUFACTURER | ROUTE_PRODUCT
                | ROUTE_TOPIC => {
                    format!("/{}", params.and_then(|p| p.se_name())?)
                }
                ROUTE_PRODUCTS_BY_TAG => format!(
                    "/producttag/{}",
                    params.and_then(|p| p.se_name())?
                ),
                _ => return None,
            };
            Some(format!("{}://shop.test{}", scheme.as_str(), path))
        }

        fn store_location(&self, scheme: Scheme) -> String {
            format!("{}://shop.test", scheme.as_str())
        }
    }

    #[derive(Debug)]
    struct FakeCatalog;

    impl ResourceCatalog for FakeCatalog {
        fn categories(&self, _store_id: StoreId) -> Result<Vec<CatalogRecord>> {
            Ok(vec![CatalogRecord::new(1), CatalogRecord::new(2)])
        }

        fn manufacturers(
            &self,
            _store_id: StoreId,
        ) -> Result<Vec<CatalogRecord>> {
            Ok(vec![CatalogRecord::new(10)])
        }

        fn visible_products(
            &self,
            _store_id: StoreId,
        ) -> Result<Vec<CatalogRecord>> {
            Ok(vec![CatalogRecord::new(20), CatalogRecord::new(21)])
        }

        fn product_tags(&self) -> Result<Vec<CatalogRecord>> {
            Ok(vec![CatalogRecord::new(30)])
        }

        fn sitemap_topics(
            &self,
            _store_id: StoreId,
        ) -> Result<Vec<CatalogRecord>> {
            Ok(vec![CatalogRecord::new(40)])
        }
    }

    #[derive(Debug)]
    struct FakeSlugs;

    impl SlugResolver for FakeSlugs {
        fn seo_slug(
            &self,
            kind: ResourceKind,
            id: u64,
            _locale: Option<LocaleId>,
        ) -> String {
            format!("{:?}-{}", kind, id).to_lowercase()
        }
    }

    fn collect(config: &SitemapConfig) -> Vec<SitemapEntry> {
        EntryCollector::new(config, &FakeRoutes, &FakeCatalog, &FakeSlugs)
            .collect_all(None)
            .unwrap()
    }

    #[test]
    fn test_collection_order_is_fixed() {
        let mut config = SitemapConfig::default();
        config.forums_enabled = true;
        config.custom_urls = vec!["sale".to_string()];

        let locations: Vec<String> = collect(&config)
            .iter()
            .map(|e| e.location().to_string())
            .collect();

        assert_eq!(
            locations,
            vec![
                "http://shop.test/",
                "http://shop.test/search",
                "http://shop.test/contactus",
                "http://shop.test/news",
                "http://shop.test/blog",
                "http://shop.test/boards",
                "http://shop.test/category-1",
                "http://shop.test/category-2",
                "http://shop.test/manufacturer-10",
                "http://shop.test/product-20",
                "http://shop.test/product-21",
                "http://shop.test/producttag/producttag-30",
                "http://shop.test/topic-40",
                "http://shop.test/sale",
            ]
        );
    }

    #[test]
    fn test_toggles_exclude_resource_kinds() {
        let mut config = SitemapConfig::default();
        config.include_categories = false;
        config.include_manufacturers = false;
        config.include_products = false;
        config.include_product_tags = false;
        config.news_enabled = false;
        config.blog_enabled = false;

        let locations: Vec<String> = collect(&config)
            .iter()
            .map(|e| e.location().to_string())
            .collect();

        // Fixed pages and topics remain.
        assert_eq!(
            locations,
            vec![
                "http://shop.test/",
                "http://shop.test/search",
                "http://shop.test/contactus",
                "http://shop.test/topic-40",
            ]
        );
    }

    #[test]
    fn test_custom_urls_have_no_alternates() {
        let mut config = SitemapConfig::default();
        config.custom_urls = vec!["/sale".to_string()];

        let entries = collect(&config);
        let custom = entries.last().unwrap();
        assert_eq!(custom.location(), "http://shop.test/sale");
        assert!(custom.alternate_locations().is_empty());
        assert_eq!(custom.update_frequency(), UpdateFrequency::Weekly);
    }

    #[test]
    fn test_provider_error_aborts_collection() {
        #[derive(Debug)]
        struct FailingCatalog;

        impl ResourceCatalog for FailingCatalog {
            fn categories(
                &self,
                _store_id: StoreId,
            ) -> Result<Vec<CatalogRecord>> {
                Err(crate::core::error::SitemapError::provider_error(
                    "storage unavailable",
                    None,
                ))
            }

            fn manufacturers(
                &self,
                _store_id: StoreId,
            ) -> Result<Vec<CatalogRecord>> {
                Ok(Vec::new())
            }

            fn visible_products(
                &self,
                _store_id: StoreId,
            ) -> Result<Vec<CatalogRecord>> {
                Ok(Vec::new())
            }

            fn product_tags(&self) -> Result<Vec<CatalogRecord>> {
                Ok(Vec::new())
            }

            fn sitemap_topics(
                &self,
                _store_id: StoreId,
            ) -> Result<Vec<CatalogRecord>> {
                Ok(Vec::new())
            }
        }

        let config = SitemapConfig::default();
        let collector = EntryCollector::new(
            &config,
            &FakeRoutes,
            &FailingCatalog,
            &FakeSlugs,
        );
        assert!(collector.collect_all(None).is_err());
    }

    #[test]
    fn test_localized_collection_carries_alternates() {
        let config = SitemapConfig::default();
        let locales =
            vec![Locale::new(1, "en"), Locale::new(2, "fr")];
        let collector = EntryCollector::new(
            &config,
            &FakeRoutes,
            &FakeCatalog,
            &FakeSlugs,
        );

        let entries = collector.collect_all(Some(&locales)).unwrap();
        let home = &entries[0];
        assert_eq!(home.location(), "http://shop.test/");
        assert_eq!(
            home.alternate_locations(),
            &[
                "http://shop.test/en/".to_string(),
                "http://shop.test/fr/".to_string(),
            ]
        );
    }
}
