//! Ordering over mixed sort values.

use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "localization")]
use o_table_core::logging::targets;

use super::value::{SortOrder, SortValue};

/// Locale-aware string comparison.
///
/// With the `localization` feature, strings are compared with an ICU4X
/// collator so accented and differently-cased letters sort near their base
/// letter. Without it, or when no collator could be loaded for the locale,
/// comparison is lexical.
pub struct Collator {
    #[cfg(feature = "localization")]
    inner: Option<icu::collator::CollatorBorrowed<'static>>,
    locale: Option<String>,
}

impl Collator {
    /// A collator for the system locale.
    #[cfg(feature = "localization")]
    pub fn system() -> Self {
        let locale = sys_locale::get_locale().unwrap_or_else(|| "en-US".to_string());
        Self::for_locale(&locale)
    }

    /// A collator for the system locale.
    #[cfg(not(feature = "localization"))]
    pub fn system() -> Self {
        Self::lexical()
    }

    /// A collator for a BCP 47 locale identifier such as `"en-GB"`.
    ///
    /// Unknown or malformed identifiers fall back to the root collation.
    #[cfg(feature = "localization")]
    pub fn for_locale(locale: &str) -> Self {
        use icu::collator::Collator as IcuCollator;
        use icu::collator::options::CollatorOptions;
        use icu::locale::Locale;

        let parsed: Locale = locale.parse().unwrap_or_else(|_| {
            tracing::debug!(target: targets::SORT, locale, "unparseable locale, using root collation");
            Locale::UNKNOWN
        });
        let inner = match IcuCollator::try_new(parsed.into(), CollatorOptions::default()) {
            Ok(collator) => Some(collator),
            Err(err) => {
                tracing::warn!(target: targets::SORT, locale, %err, "no collation data, comparing lexically");
                None
            }
        };

        Self {
            inner,
            locale: Some(locale.to_string()),
        }
    }

    /// A collator for a BCP 47 locale identifier such as `"en-GB"`.
    #[cfg(not(feature = "localization"))]
    pub fn for_locale(locale: &str) -> Self {
        Self {
            locale: Some(locale.to_string()),
        }
    }

    /// Plain lexical comparison by code point.
    pub fn lexical() -> Self {
        Self {
            #[cfg(feature = "localization")]
            inner: None,
            locale: None,
        }
    }

    /// The locale this collator was built for.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Whether locale-aware collation is in effect.
    pub fn is_locale_aware(&self) -> bool {
        #[cfg(feature = "localization")]
        let aware = self.inner.is_some();
        #[cfg(not(feature = "localization"))]
        let aware = false;
        aware
    }

    /// Compare two strings.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        #[cfg(feature = "localization")]
        if let Some(collator) = &self.inner {
            return collator.compare(a, b);
        }
        a.cmp(b)
    }
}

impl Default for Collator {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Collator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collator")
            .field("locale", &self.locale)
            .field("locale_aware", &self.is_locale_aware())
            .finish()
    }
}

/// Compare two sort values for an ascending sort.
///
/// Two texts are collated. Otherwise comparison is numeric, and a value that
/// is not a number sorts before every value that is; two non-numbers are
/// equal.
pub fn compare_ascending(a: &SortValue, b: &SortValue, collator: &Collator) -> Ordering {
    if let (SortValue::Text(a), SortValue::Text(b)) = (a, b) {
        return collator.compare(a, b);
    }
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare two sort values in the given direction.
///
/// Descending is the exact reverse of ascending, so ties stay ties.
pub fn compare(a: &SortValue, b: &SortValue, order: SortOrder, collator: &Collator) -> Ordering {
    let ascending = compare_ascending(a, b, collator);
    match order {
        SortOrder::Ascending => ascending,
        SortOrder::Descending => ascending.reverse(),
    }
}
