//! Mobile bottom sheet and the facet panels it shows.

use rust_decimal::Decimal;
use shopfacet_core::{
    Facet, FilterMetadata, FilterState, MAX_RATING, MIN_RATING, PriceBounds, SortKey,
};

/// Upper price shown in the inputs before metadata has loaded.
const FALLBACK_PRICE_MAX: i64 = 10_000;

/// A checkbox row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRow {
    /// Value sent when checked (category id, brand, size or color code).
    pub value: String,
    pub label: String,
    /// Matching products, when metadata knows it.
    pub count: Option<u64>,
    pub checked: bool,
    /// CSS color for color swatches.
    pub swatch: Option<String>,
}

/// A radio row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub value: T,
    pub label: String,
    pub checked: bool,
}

/// Content of a facet panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelBody {
    Options(Vec<OptionRow>),
    Price {
        /// Value of the "from" input.
        min: Decimal,
        /// Value of the "to" input.
        max: Decimal,
        /// Limits of both inputs.
        bounds: PriceBounds,
    },
    Rating(Vec<Choice<u8>>),
    Sort(Vec<Choice<SortKey>>),
    /// Nothing to choose from.
    Empty(&'static str),
}

/// One facet's controls, built from the selection and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetPanel {
    pub facet: Facet,
    pub title: &'static str,
    pub body: PanelBody,
    /// Count shown on the apply button.
    pub apply_count: u64,
}

impl FacetPanel {
    #[must_use]
    pub fn build(
        facet: Facet,
        state: &FilterState,
        metadata: &FilterMetadata,
        apply_count: u64,
    ) -> Self {
        let body = match facet {
            Facet::Categories => category_rows(state, metadata),
            Facet::Brand => brand_rows(state, metadata),
            Facet::Size => size_rows(state, metadata),
            Facet::Color => color_rows(state, metadata),
            Facet::Price => price_inputs(state, metadata),
            Facet::Rating => PanelBody::Rating(
                (MIN_RATING..=MAX_RATING)
                    .rev()
                    .map(|value| Choice {
                        value,
                        label: rating_label(value),
                        checked: state.rating.contains(&value),
                    })
                    .collect(),
            ),
            Facet::Sort => PanelBody::Sort(
                SortKey::ALL
                    .into_iter()
                    .map(|value| Choice {
                        value,
                        label: value.label().to_string(),
                        checked: state.sort_by == value,
                    })
                    .collect(),
            ),
        };

        Self {
            facet,
            title: facet.title(),
            body,
            apply_count,
        }
    }

    /// Checked rows or choices in this panel.
    #[must_use]
    pub fn checked_count(&self) -> usize {
        match &self.body {
            PanelBody::Options(rows) => rows.iter().filter(|r| r.checked).count(),
            PanelBody::Rating(choices) => choices.iter().filter(|c| c.checked).count(),
            PanelBody::Sort(choices) => choices.iter().filter(|c| c.checked).count(),
            PanelBody::Price { .. } | PanelBody::Empty(_) => 0,
        }
    }
}

fn rating_label(value: u8) -> String {
    if value == MAX_RATING {
        format!("{value}★")
    } else {
        format!("{value}★ & up")
    }
}

fn options_or_empty(rows: Vec<OptionRow>, empty: &'static str) -> PanelBody {
    if rows.is_empty() {
        PanelBody::Empty(empty)
    } else {
        PanelBody::Options(rows)
    }
}

/// Rows for selected values the metadata does not list, so they can still be
/// unchecked.
fn orphan_rows<'a, I>(selected: I, known: &[&str]) -> impl Iterator<Item = OptionRow>
where
    I: IntoIterator<Item = &'a String>,
{
    let known: Vec<String> = known.iter().map(|s| (*s).to_string()).collect();
    selected
        .into_iter()
        .filter(move |value| !known.contains(value))
        .map(|value| OptionRow {
            value: value.clone(),
            label: value.clone(),
            count: None,
            checked: true,
            swatch: None,
        })
}

fn category_rows(state: &FilterState, metadata: &FilterMetadata) -> PanelBody {
    let mut rows: Vec<OptionRow> = metadata
        .categories
        .iter()
        .map(|c| OptionRow {
            value: c.id.to_string(),
            label: c.title.clone(),
            count: Some(c.count),
            checked: state.categories.contains(&c.id),
            swatch: None,
        })
        .collect();

    for id in &state.categories {
        if metadata.category_title(*id).is_none() {
            rows.push(OptionRow {
                value: id.to_string(),
                label: format!("Category {id}"),
                count: None,
                checked: true,
                swatch: None,
            });
        }
    }

    options_or_empty(rows, "No categories found")
}

fn brand_rows(state: &FilterState, metadata: &FilterMetadata) -> PanelBody {
    let mut rows: Vec<OptionRow> = metadata
        .brands
        .iter()
        .map(|b| OptionRow {
            value: b.name.clone(),
            label: b.name.clone(),
            count: Some(b.count),
            checked: state.brands.contains(&b.name),
            swatch: None,
        })
        .collect();
    let known: Vec<&str> = metadata.brands.iter().map(|b| b.name.as_str()).collect();
    rows.extend(orphan_rows(&state.brands, &known));

    options_or_empty(rows, "No brands found")
}

fn size_rows(state: &FilterState, metadata: &FilterMetadata) -> PanelBody {
    let mut rows: Vec<OptionRow> = metadata
        .sizes
        .iter()
        .map(|s| OptionRow {
            value: s.name.clone(),
            label: s.name.clone(),
            // Sizes without products show no count badge
            count: (s.count > 0).then_some(s.count),
            checked: state.sizes.contains(&s.name),
            swatch: None,
        })
        .collect();
    let known: Vec<&str> = metadata.sizes.iter().map(|s| s.name.as_str()).collect();
    rows.extend(orphan_rows(&state.sizes, &known));

    options_or_empty(rows, "No sizes found")
}

fn color_rows(state: &FilterState, metadata: &FilterMetadata) -> PanelBody {
    let mut rows: Vec<OptionRow> = metadata
        .colors
        .iter()
        .map(|c| OptionRow {
            value: c.name.clone(),
            label: c.label().to_string(),
            count: Some(c.count),
            checked: state.colors.contains(&c.name),
            swatch: Some(c.swatch().to_string()),
        })
        .collect();
    let known: Vec<&str> = metadata.colors.iter().map(|c| c.name.as_str()).collect();
    rows.extend(orphan_rows(&state.colors, &known));

    options_or_empty(rows, "No colors found")
}

fn price_inputs(state: &FilterState, metadata: &FilterMetadata) -> PanelBody {
    let bounds = if metadata.price_range.is_known() {
        metadata.price_range
    } else {
        PriceBounds::new(Decimal::ZERO, Decimal::from(FALLBACK_PRICE_MAX))
    };
    let (min, max) = state.price_range.effective(&bounds);
    PanelBody::Price { min, max, bounds }
}

// =============================================================================
// BottomSheet
// =============================================================================

/// The mobile filter sheet: closed, or open on one facet panel.
#[derive(Debug, Clone, Default)]
pub struct BottomSheet {
    panel: Option<FacetPanel>,
}

impl BottomSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the sheet on `facet`, replacing any panel already shown.
    pub fn open(
        &mut self,
        facet: Facet,
        state: &FilterState,
        metadata: &FilterMetadata,
        apply_count: u64,
    ) -> &FacetPanel {
        self.panel
            .insert(FacetPanel::build(facet, state, metadata, apply_count))
    }

    /// Rebuild the open panel after the selection or metadata changed.
    pub fn refresh(&mut self, state: &FilterState, metadata: &FilterMetadata, apply_count: u64) {
        if let Some(panel) = &mut self.panel {
            *panel = FacetPanel::build(panel.facet, state, metadata, apply_count);
        }
    }

    pub fn close(&mut self) {
        self.panel = None;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.panel.is_some()
    }

    #[must_use]
    pub const fn panel(&self) -> Option<&FacetPanel> {
        self.panel.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use shopfacet_core::{BrandOption, CategoryId, CategoryOption, ColorOption};

    use super::*;

    fn metadata() -> FilterMetadata {
        FilterMetadata {
            categories: vec![CategoryOption {
                id: CategoryId::new(1),
                title: "Shoes".to_string(),
                count: 12,
            }],
            brands: vec![
                BrandOption {
                    name: "Acme".to_string(),
                    count: 4,
                },
                BrandOption {
                    name: "Globex".to_string(),
                    count: 2,
                },
            ],
            colors: vec![ColorOption {
                name: "navy".to_string(),
                display_name: Some("Navy blue".to_string()),
                code: Some("#001f3f".to_string()),
                count: 3,
            }],
            price_range: PriceBounds::new(Decimal::from(5), Decimal::from(5000)),
            ..FilterMetadata::default()
        }
    }

    #[test]
    fn test_checked_rows_follow_state() {
        let mut state = FilterState::default();
        state.toggle_brand("Globex");

        let panel = FacetPanel::build(Facet::Brand, &state, &metadata(), 9);
        let PanelBody::Options(rows) = &panel.body else {
            panic!("expected options");
        };
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].checked);
        assert!(rows[1].checked);
        assert_eq!(rows[1].count, Some(2));
        assert_eq!(panel.apply_count, 9);
        assert_eq!(panel.checked_count(), 1);
    }

    #[test]
    fn test_unlisted_selection_still_shown() {
        let mut state = FilterState::default();
        state.toggle_category(CategoryId::new(77));

        let panel = FacetPanel::build(Facet::Categories, &state, &metadata(), 0);
        let PanelBody::Options(rows) = &panel.body else {
            panic!("expected options");
        };
        assert_eq!(rows.last().map(|r| r.label.as_str()), Some("Category 77"));
        assert!(rows.last().is_some_and(|r| r.checked));
    }

    #[test]
    fn test_empty_state_when_no_options() {
        let panel = FacetPanel::build(
            Facet::Size,
            &FilterState::default(),
            &FilterMetadata::default(),
            0,
        );
        assert_eq!(panel.body, PanelBody::Empty("No sizes found"));
    }

    #[test]
    fn test_color_rows_carry_swatch() {
        let panel = FacetPanel::build(Facet::Color, &FilterState::default(), &metadata(), 0);
        let PanelBody::Options(rows) = &panel.body else {
            panic!("expected options");
        };
        assert_eq!(rows[0].label, "Navy blue");
        assert_eq!(rows[0].swatch.as_deref(), Some("#001f3f"));
    }

    #[test]
    fn test_price_inputs_use_selection_then_bounds() {
        let mut state = FilterState::default();
        state.set_price_range(None, Some(Decimal::from(3000)));

        let panel = FacetPanel::build(Facet::Price, &state, &metadata(), 0);
        assert_eq!(
            panel.body,
            PanelBody::Price {
                min: Decimal::from(5),
                max: Decimal::from(3000),
                bounds: PriceBounds::new(Decimal::from(5), Decimal::from(5000)),
            }
        );

        let panel = FacetPanel::build(
            Facet::Price,
            &FilterState::default(),
            &FilterMetadata::default(),
            0,
        );
        let PanelBody::Price { max, .. } = panel.body else {
            panic!("expected price inputs");
        };
        assert_eq!(max, Decimal::from(10_000));
    }

    #[test]
    fn test_rating_and_sort_are_radios() {
        let mut state = FilterState::default();
        state.select_rating(Some(4));
        state.sort_by = SortKey::Popular;

        let rating = FacetPanel::build(Facet::Rating, &state, &metadata(), 0);
        let PanelBody::Rating(choices) = &rating.body else {
            panic!("expected rating choices");
        };
        assert_eq!(choices[0].value, 5);
        assert_eq!(choices[0].label, "5★");
        assert!(choices[1].checked);
        assert_eq!(rating.checked_count(), 1);

        let sort = FacetPanel::build(Facet::Sort, &state, &metadata(), 0);
        assert_eq!(sort.checked_count(), 1);
    }

    #[test]
    fn test_sheet_open_refresh_close() {
        let mut sheet = BottomSheet::new();
        let mut state = FilterState::default();
        assert!(!sheet.is_open());

        sheet.open(Facet::Brand, &state, &metadata(), 0);
        assert!(sheet.is_open());

        state.toggle_brand("Acme");
        sheet.refresh(&state, &metadata(), 4);
        let panel = sheet.panel().expect("sheet open");
        assert_eq!(panel.checked_count(), 1);
        assert_eq!(panel.apply_count, 4);

        sheet.close();
        assert!(sheet.panel().is_none());
    }
}
