//! Catalog data and the page compiler.
//!
//! The catalog is what the surrounding "markup" would be in a browser: it is
//! loaded from a TOML manifest (or the built-in sample) and compiled into a
//! [`Page`] tree that the enhancer then decorates.  The enhancer itself never
//! reads catalog types — it only sees elements, classes and attributes.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::page::{Element, ElementKind, Page};

/// Class carried by every book card (the fade-in pass selects on it).
pub const CLASS_CARD: &str = "book-card";
/// Class carried by nav anchors.
pub const CLASS_NAV_LINK: &str = "nav-link";
/// Primary-action button class.
pub const CLASS_BTN_PRIMARY: &str = "btn-primary";
/// Marker attribute identifying add-to-cart controls.
pub const ATTR_ACTION: &str = "data-action";
/// Marker value identifying add-to-cart controls.
pub const ACTION_ADD_TO_CART: &str = "add-to-cart";
/// Resting label of an add-to-cart control.
pub const CART_BUTTON_LABEL: &str = "+ Add to Cart";

// ───────────────────────────────────────── errors ────────────

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read catalog manifest {path}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog manifest {path}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ───────────────────────────────────────── data model ────────

/// One book in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
}

/// A titled browsing section — what fragment anchors jump to.
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    /// Fragment identifier (`#id` in nav links).  Keep these unique.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub books: Vec<Book>,
}

/// The whole storefront catalog.
///
/// Manifest format:
///
/// ```toml
/// [[sections]]
/// id = "fiction"
/// title = "Fiction"
///
/// [[sections.books]]
/// title = "The Dispossessed"
/// author = "Ursula K. Le Guin"
/// price = 11.99
/// stock = 4
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Catalog {
    /// Load a catalog manifest from disk.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path).map_err(|source| StoreError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: Catalog =
            toml::from_str(&contents).map_err(|source| StoreError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(
            path = %path.display(),
            sections = catalog.sections.len(),
            "catalog manifest loaded"
        );
        Ok(catalog)
    }

    /// Built-in demo catalog so the binary runs without arguments.
    pub fn sample() -> Self {
        let book = |title: &str, author: &str, price: f64, stock: u32| Book {
            title: title.into(),
            author: author.into(),
            price,
            stock,
        };
        Self {
            sections: vec![
                Section {
                    id: "fiction".into(),
                    title: "Fiction".into(),
                    books: vec![
                        book("The Dispossessed", "Ursula K. Le Guin", 11.99, 4),
                        book("Invisible Cities", "Italo Calvino", 9.50, 7),
                        book("Kindred", "Octavia E. Butler", 13.25, 2),
                    ],
                },
                Section {
                    id: "science".into(),
                    title: "Science".into(),
                    books: vec![
                        book("The Selfish Gene", "Richard Dawkins", 10.75, 5),
                        book("Gödel, Escher, Bach", "Douglas Hofstadter", 18.00, 1),
                    ],
                },
                Section {
                    id: "poetry".into(),
                    title: "Poetry".into(),
                    books: vec![book("Devotions", "Mary Oliver", 14.40, 3)],
                },
            ],
        }
    }

    pub fn book_count(&self) -> usize {
        self.sections.iter().map(|s| s.books.len()).sum()
    }
}

// ───────────────────────────────────────── page compiler ─────

/// Compile a catalog into the element tree the enhancer operates over.
///
/// Layout: one nav bar of fragment anchors, then one section per catalog
/// section — heading, then a card per book, each card holding its
/// add-to-cart button.  Book data the renderer needs travels as `data-*`
/// attributes so the element tree stays self-describing.
pub fn build_page(catalog: &Catalog) -> Page {
    let mut page = Page::new();

    let nav = page.add_child(page.root, Element::new(ElementKind::Nav));
    for section in &catalog.sections {
        page.add_child(
            nav,
            Element::new(ElementKind::Anchor)
                .with_text(&section.title)
                .with_class(CLASS_NAV_LINK)
                .with_attr("href", format!("#{}", section.id)),
        );
    }

    for section in &catalog.sections {
        let section_el = page.add_child(
            page.root,
            Element::new(ElementKind::Section)
                .with_fragment(&section.id)
                .with_class("store-section"),
        );
        page.add_child(
            section_el,
            Element::new(ElementKind::Heading).with_text(&section.title),
        );

        for book in &section.books {
            let card = page.add_child(
                section_el,
                Element::new(ElementKind::Card)
                    .with_text(&book.title)
                    .with_class(CLASS_CARD)
                    .with_attr("data-author", &book.author)
                    .with_attr("data-price", format!("{:.2}", book.price))
                    .with_attr("data-stock", book.stock.to_string()),
            );
            page.add_child(
                card,
                Element::new(ElementKind::Button)
                    .with_text(CART_BUTTON_LABEL)
                    .with_class("btn")
                    .with_class(CLASS_BTN_PRIMARY)
                    .with_attr(ATTR_ACTION, ACTION_ADD_TO_CART)
                    .with_attr("data-title", &book.title)
                    .with_attr("data-price", format!("{:.2}", book.price)),
            );
        }
    }

    page
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn manifest_round_trip() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"
[[sections]]
id = "history"
title = "History"

[[sections.books]]
title = "SPQR"
author = "Mary Beard"
price = 12.00
stock = 9
"#
        )
        .expect("write manifest");

        let catalog = Catalog::load(file.path()).expect("loads");
        assert_eq!(catalog.sections.len(), 1);
        assert_eq!(catalog.sections[0].books[0].author, "Mary Beard");
        assert_eq!(catalog.book_count(), 1);
    }

    #[test]
    fn load_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not = [valid").expect("write");
        assert!(matches!(
            Catalog::load(file.path()),
            Err(StoreError::ManifestParse { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        assert!(matches!(
            Catalog::load(Path::new("/nonexistent/catalog.toml")),
            Err(StoreError::ManifestRead { .. })
        ));
    }

    #[test]
    fn built_page_wires_anchors_to_sections() {
        let page = build_page(&Catalog::sample());

        let anchors = page.select_href_prefix("#");
        assert_eq!(anchors.len(), 3);
        for id in anchors {
            let href = page.attr(id, "href").expect("anchor href");
            let fragment = href.strip_prefix('#').expect("fragment href");
            assert!(page.element_by_fragment(fragment).is_some());
        }
    }

    #[test]
    fn built_page_marks_every_card_and_button() {
        let catalog = Catalog::sample();
        let page = build_page(&catalog);

        assert_eq!(page.select_class(CLASS_CARD).len(), catalog.book_count());
        let buttons = page.select_attr(ATTR_ACTION, ACTION_ADD_TO_CART);
        assert_eq!(buttons.len(), catalog.book_count());
        for id in buttons {
            assert!(page.has_class(id, CLASS_BTN_PRIMARY));
            assert_eq!(page.get(id).text, CART_BUTTON_LABEL);
        }
    }

    #[test]
    fn empty_catalog_builds_bare_page() {
        let page = build_page(&Catalog::default());
        assert!(page.select_class(CLASS_CARD).is_empty());
        assert!(page.select_href_prefix("#").is_empty());
        assert!(page.select_attr(ATTR_ACTION, ACTION_ADD_TO_CART).is_empty());
    }
}
