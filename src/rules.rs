//! Ordered extraction rules.
//!
//! Every field the parser reads is described by a slice of [`Rule`]s in
//! precedence order. The first rule that yields an accepted, non-empty value
//! wins; the remaining rules are its fallbacks.

use crate::helpers::clean_text;
use scraper::{ElementRef, Selector};

/// How a value is read from a matched element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// Whitespace-normalized text content
    Text,
    /// Text of the first non-empty `<p>` inside the element
    FirstParagraph,
    /// First attribute, in the given order, holding an accepted value
    Attrs(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub selector: &'static str,
    pub pick: Pick,
}

/// A value together with the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub rule: &'static str,
    pub value: String,
}

impl Rule {
    pub const fn text(name: &'static str, selector: &'static str) -> Self {
        Self {
            name,
            selector,
            pick: Pick::Text,
        }
    }

    pub const fn paragraph(name: &'static str, selector: &'static str) -> Self {
        Self {
            name,
            selector,
            pick: Pick::FirstParagraph,
        }
    }

    pub const fn attrs(
        name: &'static str,
        selector: &'static str,
        attrs: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            selector,
            pick: Pick::Attrs(attrs),
        }
    }

    fn selector(&self) -> Option<Selector> {
        match Selector::parse(self.selector) {
            Ok(sel) => Some(sel),
            Err(e) => {
                log::debug!(
                    "Skipping rule {} with bad selector {:?}: {:?}",
                    self.name,
                    self.selector,
                    e
                );
                None
            }
        }
    }

    /// Read this rule's value from one element
    pub fn pick_from<F>(&self, element: ElementRef<'_>, accept: F) -> Option<String>
    where
        F: Fn(&str) -> bool,
    {
        match self.pick {
            Pick::Text => Some(clean_text(&element.text().collect::<String>()))
                .filter(|t| !t.is_empty() && accept(t.as_str())),
            Pick::FirstParagraph => {
                let p = Selector::parse("p").ok()?;
                let text = element
                    .select(&p)
                    .map(|e| clean_text(&e.text().collect::<String>()))
                    .find(|t| !t.is_empty() && accept(t.as_str()));
                text
            }
            Pick::Attrs(attrs) => attrs.iter().find_map(|attr| {
                element
                    .value()
                    .attr(attr)
                    .map(str::trim)
                    .filter(|v| !v.is_empty() && accept(*v))
                    .map(str::to_string)
            }),
        }
    }

    /// Every accepted value under `scope`, in document order
    pub fn collect<F>(&self, scope: ElementRef<'_>, accept: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let Some(selector) = self.selector() else {
            return Vec::new();
        };
        scope
            .select(&selector)
            .filter_map(|el| self.pick_from(el, &accept))
            .collect()
    }

    /// First accepted value under `scope`
    pub fn first<F>(&self, scope: ElementRef<'_>, accept: F) -> Option<String>
    where
        F: Fn(&str) -> bool,
    {
        let selector = self.selector()?;
        let value = scope
            .select(&selector)
            .find_map(|el| self.pick_from(el, &accept));
        value
    }
}

/// Value of the highest-precedence rule that yields one
pub fn first_hit<F>(scope: ElementRef<'_>, rules: &[Rule], accept: F) -> Option<Hit>
where
    F: Fn(&str) -> bool,
{
    rules.iter().find_map(|rule| {
        rule.first(scope, &accept).map(|value| Hit {
            rule: rule.name,
            value,
        })
    })
}

/// [`first_hit`] accepting any non-empty value
pub fn first_value(scope: ElementRef<'_>, rules: &[Rule]) -> Option<String> {
    first_hit(scope, rules, |_| true).map(|hit| hit.value)
}

/// All values of the highest-precedence rule that yields at least one.
///
/// Later rules are only consulted when every earlier rule came back empty.
pub fn collect_first<F>(
    scope: ElementRef<'_>,
    rules: &[Rule],
    accept: F,
) -> Option<(&'static str, Vec<String>)>
where
    F: Fn(&str) -> bool,
{
    rules.iter().find_map(|rule| {
        let values = rule.collect(scope, &accept);
        (!values.is_empty()).then_some((rule.name, values))
    })
}
