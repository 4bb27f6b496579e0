//! # XML Writer Module
//!
//! Streaming serialization of sitemap documents and sitemap-index documents.
//! Elements are written to the output stream as they are produced, so memory
//! use stays bounded by the entry list rather than the serialized document.
//!
//! One logical entry fans out into several `<url>` blocks: the canonical
//! block first, then one block per alternate location that differs from the
//! canonical, each block repeating the full `xhtml:link rel="alternate"` set.
//! Every locale variant of a page thereby announces all of its siblings,
//! including the canonical one.

use std::io::Write;

use chrono::Utc;
use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use url::Url;

use crate::collector::ROUTE_SITEMAP_SHARD;
use crate::core::error::{Result, SitemapError};
use crate::core::traits::{RouteParams, RouteResolver, Scheme};
use crate::entry::SitemapEntry;
use crate::locale::{detect_locale_from_path, Locale};

/// Root namespace of sitemap documents.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
/// XML Schema instance namespace.
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// XHTML namespace carrying the alternate-link elements.
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
/// Schema location advertised on the root element.
const SCHEMA_LOCATION: &str = "http://www.sitemaps.org/schemas/sitemap/0.9 \
     http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd";

/// Fixed, culture-invariant format of every `<lastmod>` value.
///
/// This is a compatibility surface for sitemap consumers; do not change it.
/// It is the chrono equivalent of `yyyy-MM-ddTHH:mm:sszzz`.
pub const SITEMAP_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Serializes shards and shard indexes as sitemap XML.
#[derive(Debug)]
pub struct SitemapXmlWriter<'a> {
    routes: &'a dyn RouteResolver,
    locales: &'a [Locale],
    path_base: &'a str,
    scheme: Scheme,
}

impl<'a> SitemapXmlWriter<'a> {
    /// Creates a writer bound to the route resolver (for shard addressing),
    /// the active locales (for `hreflang` recovery), the path base and the
    /// scheme of the current run.
    pub fn new(
        routes: &'a dyn RouteResolver,
        locales: &'a [Locale],
        path_base: &'a str,
        scheme: Scheme,
    ) -> Self {
        Self {
            routes,
            locales,
            path_base,
            scheme,
        }
    }

    /// Writes one shard as a complete `<urlset>` sitemap document.
    pub fn write_sitemap<W: Write>(
        &self,
        output: W,
        entries: &[SitemapEntry],
    ) -> Result<()> {
        let mut writer = Writer::new_with_indent(output, b' ', 2);
        write_declaration(&mut writer)?;
        writer.write_event(Event::Start(root_element("urlset")))?;

        for entry in entries {
            self.write_url_block(&mut writer, entry)?;

            // Re-emit the logical resource once per distinct locale variant,
            // each variant carrying the same sibling set.
            for alternate in entry.alternate_locations().iter().filter(
                |alternate| {
                    !alternate.eq_ignore_ascii_case(entry.location())
                },
            ) {
                self.write_url_block(
                    &mut writer,
                    &entry.with_location(alternate.as_str()),
                )?;
            }
        }

        writer.write_event(Event::End(BytesEnd::new("urlset")))?;
        Ok(())
    }

    /// Writes a `<sitemapindex>` document listing `shard_count` shards,
    /// addressed 1-based through the shard route.
    pub fn write_sitemap_index<W: Write>(
        &self,
        output: W,
        shard_count: usize,
    ) -> Result<()> {
        let mut writer = Writer::new_with_indent(output, b' ', 2);
        write_declaration(&mut writer)?;
        writer.write_event(Event::Start(root_element("sitemapindex")))?;

        let lastmod =
            Utc::now().format(SITEMAP_DATE_FORMAT).to_string();
        for id in 1..=shard_count {
            let location = self
                .routes
                .route_url(
                    ROUTE_SITEMAP_SHARD,
                    Some(&RouteParams::with_id(id)),
                    self.scheme,
                )
                .ok_or_else(|| {
                    SitemapError::xml_output_error(
                        format!(
                            "shard route `{}` did not resolve for id {}",
                            ROUTE_SITEMAP_SHARD, id
                        ),
                        None,
                    )
                })?;

            writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
            write_text_element(&mut writer, "loc", &location)?;
            write_text_element(&mut writer, "lastmod", &lastmod)?;
            writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;
        Ok(())
    }

    /// Writes a single `<url>` block: location, alternate links, change
    /// frequency and last-modification time.
    fn write_url_block<W: Write>(
        &self,
        writer: &mut Writer<W>,
        entry: &SitemapEntry,
    ) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(writer, "loc", entry.location())?;

        for alternate in entry.alternate_locations() {
            if alternate.is_empty() {
                continue;
            }

            // The hreflang code is recovered by re-detecting the locale from
            // the alternate's own path; an undetectable alternate loses its
            // link element but keeps its top-level block.
            let locale = Url::parse(alternate)
                .ok()
                .and_then(|url| {
                    let path_and_query = match url.query() {
                        Some(query) => {
                            format!("{}?{}", url.path(), query)
                        }
                        None => url.path().to_string(),
                    };
                    detect_locale_from_path(
                        &path_and_query,
                        self.path_base,
                        self.locales,
                    )
                    .cloned()
                });

            let locale = match locale {
                Some(locale) => locale,
                None => {
                    debug!(
                        "No locale code recoverable from `{}`; link omitted",
                        alternate
                    );
                    continue;
                }
            };

            let mut link = BytesStart::new("xhtml:link");
            link.push_attribute(("rel", "alternate"));
            link.push_attribute(("hreflang", locale.code.as_str()));
            link.push_attribute(("href", alternate.as_str()));
            writer.write_event(Event::Empty(link))?;
        }

        write_text_element(
            writer,
            "changefreq",
            entry.update_frequency().as_str(),
        )?;
        write_text_element(
            writer,
            "lastmod",
            &entry.updated_on().format(SITEMAP_DATE_FORMAT).to_string(),
        )?;

        writer.write_event(Event::End(BytesEnd::new("url")))?;
        Ok(())
    }
}

/// Writes the XML declaration.
fn write_declaration<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new(
        "1.0",
        Some("utf-8"),
        None,
    )))?;
    Ok(())
}

/// Builds a root element carrying the sitemap namespaces and schema location.
fn root_element(name: &str) -> BytesStart<'_> {
    let mut root = BytesStart::new(name);
    root.push_attribute(("xmlns", SITEMAP_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xmlns:xhtml", XHTML_NS));
    root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
    root
}

/// Writes one `<name>text</name>` element; the writer escapes the text.
fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
