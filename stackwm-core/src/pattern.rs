//! The window-matching DSL.
//!
//! A pattern is a line of `(MATCH)` groups followed by an optional
//! `{LIMIT}`: `(title=xterm)(workspace=[current]){2}`. Each group is
//! either bare text (an implicit title match), `prop=regex`,
//! `prop!=regex`, or `@XNAME=regex` for an arbitrary X property. Terms
//! are ANDed in order; the first failing term wins.
use crate::models::{Focusable, Screen, WindowStore};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of matchable window properties.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Title,
    Class,
    Name,
    Role,
    Transient,
    Maximized,
    Minimized,
    Fullscreen,
    MaximizedVertical,
    MaximizedHorizontal,
    Shaded,
    Stuck,
    FocusHidden,
    IconHidden,
    Viewable,
    Workspace,
    WorkspaceName,
    Head,
    Layer,
    Screen,
    /// An arbitrary X property, matched by external name.
    XProp,
}

impl Property {
    /// Case-insensitive lookup in the property table. `None` means the
    /// caller should fall back to a literal title match.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let prop = match name.to_lowercase().as_str() {
            "title" => Self::Title,
            "class" => Self::Class,
            "name" => Self::Name,
            "role" => Self::Role,
            "transient" => Self::Transient,
            "maximized" => Self::Maximized,
            "minimized" => Self::Minimized,
            "fullscreen" => Self::Fullscreen,
            "maximizedvertical" => Self::MaximizedVertical,
            "maximizedhorizontal" => Self::MaximizedHorizontal,
            "shaded" => Self::Shaded,
            "stuck" => Self::Stuck,
            "focushidden" => Self::FocusHidden,
            "iconhidden" => Self::IconHidden,
            "viewable" => Self::Viewable,
            "workspace" => Self::Workspace,
            "workspacename" => Self::WorkspaceName,
            "head" => Self::Head,
            "layer" => Self::Layer,
            "screen" => Self::Screen,
            _ => return None,
        };
        Some(prop)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Class => "class",
            Self::Name => "name",
            Self::Role => "role",
            Self::Transient => "transient",
            Self::Maximized => "maximized",
            Self::Minimized => "minimized",
            Self::Fullscreen => "fullscreen",
            Self::MaximizedVertical => "maximizedvertical",
            Self::MaximizedHorizontal => "maximizedhorizontal",
            Self::Shaded => "shaded",
            Self::Stuck => "stuck",
            Self::FocusHidden => "focushidden",
            Self::IconHidden => "iconhidden",
            Self::Viewable => "viewable",
            Self::Workspace => "workspace",
            Self::WorkspaceName => "workspacename",
            Self::Head => "head",
            Self::Layer => "layer",
            Self::Screen => "screen",
            Self::XProp => "@",
        }
    }

    /// String projection of a property for a focusable. Side-effect
    /// free and callable without any live pattern; rule-authoring code
    /// uses it to derive default match text from a window.
    #[must_use]
    pub fn project(self, target: Focusable, store: &WindowStore, ctx: &MatchContext) -> String {
        let client = store.resolve_client(target).and_then(|c| store.client(c));
        let window = store.owning_window(target);
        let yes_no = |b: bool| if b { "yes" } else { "no" }.to_string();
        match self {
            Self::Title => client.map(|c| c.title.clone()).unwrap_or_default(),
            Self::Class => client.map(|c| c.res_class.clone()).unwrap_or_default(),
            Self::Role => client.map(|c| c.wm_role.clone()).unwrap_or_default(),
            Self::Transient => yes_no(client.is_some_and(|c| c.transient)),
            Self::Maximized => yes_no(window.is_some_and(|w| w.maximized)),
            Self::Minimized => yes_no(window.is_some_and(|w| w.iconic)),
            Self::Fullscreen => yes_no(window.is_some_and(|w| w.fullscreen)),
            Self::MaximizedVertical => yes_no(window.is_some_and(|w| w.maximized_vert)),
            Self::MaximizedHorizontal => yes_no(window.is_some_and(|w| w.maximized_horz)),
            Self::Shaded => yes_no(window.is_some_and(|w| w.shaded)),
            Self::Stuck => yes_no(window.is_some_and(|w| w.stuck)),
            Self::FocusHidden => yes_no(window.is_some_and(|w| w.focus_hidden)),
            Self::IconHidden => yes_no(window.is_some_and(|w| w.icon_hidden)),
            Self::Viewable => yes_no(window.is_some_and(|w| {
                !w.iconic && (w.stuck || w.workspace == ctx.current_workspace)
            })),
            Self::Workspace => window.map(|w| w.workspace.to_string()).unwrap_or_default(),
            Self::WorkspaceName => window
                .and_then(|w| ctx.workspace_names.get(w.workspace))
                .cloned()
                .unwrap_or_default(),
            Self::Head => window.map(|w| w.head.to_string()).unwrap_or_default(),
            Self::Layer => window.map(|w| w.layer.to_string()).unwrap_or_default(),
            Self::Screen => window
                .map_or(ctx.screen, |w| w.screen)
                .to_string(),
            Self::XProp => String::new(),
            Self::Name => client.map(|c| c.res_name.clone()).unwrap_or_default(),
        }
    }
}

/// The caller's surroundings a match is evaluated in.
pub struct MatchContext<'a> {
    pub screen: usize,
    pub current_workspace: usize,
    pub workspace_names: &'a [String],
    pub pointer_head: usize,
    pub focused: Option<Focusable>,
}

impl<'a> MatchContext<'a> {
    #[must_use]
    pub fn new(screen: &'a Screen, focused: Option<Focusable>) -> Self {
        Self {
            screen: screen.id,
            current_workspace: screen.current_workspace,
            workspace_names: &screen.workspace_names,
            pointer_head: screen.pointer_head(),
            focused,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternParseError {
    #[error("pattern has no match groups")]
    Empty,
    #[error("unbalanced parenthesis")]
    Unbalanced,
    #[error("invalid regular expression: {0}")]
    BadRegex(String),
    #[error("invalid match limit")]
    BadLimit,
    #[error("trailing characters after pattern")]
    TrailingGarbage,
}

#[derive(Debug, Clone)]
struct Term {
    prop: Property,
    regex: Regex,
    /// Original regex text; equality and the `[current]`/`[mouse]`
    /// sentinels are decided on this, never on the compiled form.
    source: String,
    negate: bool,
    xprop_name: String,
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.prop == other.prop
            && self.source == other.source
            && self.negate == other.negate
            && self.xprop_name == other.xprop_name
    }
}

/// A compiled window pattern: an AND over ordered terms plus an
/// optional match-count limit.
#[derive(Debug, Clone, Default)]
pub struct ClientPattern {
    terms: Vec<Term>,
    match_limit: u32,
    match_count: u32,
    parse_error: Option<PatternParseError>,
}

impl PartialEq for ClientPattern {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl FromStr for ClientPattern {
    type Err = PatternParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pat = Self::default();
        let mut rest = s.trim_start();
        let mut groups = 0usize;
        while !rest.is_empty() {
            if let Some(body) = rest.strip_prefix('(') {
                let (inner, after) =
                    take_until_close(body).ok_or(PatternParseError::Unbalanced)?;
                pat.parse_term(&inner)?;
                groups += 1;
                rest = after.trim_start();
            } else if let Some(body) = rest.strip_prefix('{') {
                let end = body.find('}').ok_or(PatternParseError::BadLimit)?;
                let limit: u32 = body[..end]
                    .trim()
                    .parse()
                    .map_err(|_| PatternParseError::BadLimit)?;
                if limit == 0 {
                    return Err(PatternParseError::BadLimit);
                }
                if !body[end + 1..].trim().is_empty() {
                    return Err(PatternParseError::TrailingGarbage);
                }
                pat.match_limit = limit;
                rest = "";
            } else {
                return Err(PatternParseError::TrailingGarbage);
            }
        }
        if groups == 0 {
            return Err(PatternParseError::Empty);
        }
        Ok(pat)
    }
}

impl ClientPattern {
    /// Compile a pattern, swallowing parse failures into the error
    /// state: a failed pattern holds no terms and never matches.
    #[must_use]
    pub fn new(source: &str) -> Self {
        match source.parse() {
            Ok(pat) => pat,
            Err(err) => Self {
                parse_error: Some(err),
                ..Self::default()
            },
        }
    }

    /// A pattern without terms is in error state and matches nothing.
    #[must_use]
    pub fn error(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn parse_error(&self) -> Option<&PatternParseError> {
        self.parse_error.as_ref()
    }

    /// Append a term. On a bad regex the term is discarded and false
    /// is returned; existing terms are untouched.
    pub fn add_term(
        &mut self,
        text: &str,
        prop: Property,
        negate: bool,
        xprop_name: Option<&str>,
    ) -> bool {
        self.push_term(text, prop, negate, xprop_name.unwrap_or(""))
            .is_ok()
    }

    fn push_term(
        &mut self,
        text: &str,
        prop: Property,
        negate: bool,
        xprop_name: &str,
    ) -> Result<(), PatternParseError> {
        let regex = Regex::new(&format!("^(?:{text})$"))
            .map_err(|e| PatternParseError::BadRegex(e.to_string()))?;
        self.terms.push(Term {
            prop,
            regex,
            source: text.to_string(),
            negate,
            xprop_name: xprop_name.to_string(),
        });
        Ok(())
    }

    fn parse_term(&mut self, inner: &str) -> Result<(), PatternParseError> {
        let Some(eq) = inner.find('=') else {
            // Bare text is an implicit title match.
            return self.push_term(inner, Property::Title, false, "");
        };
        let (mut name, value) = (&inner[..eq], &inner[eq + 1..]);
        let negate = name.ends_with('!');
        if negate {
            name = &name[..name.len() - 1];
        }
        let name = name.trim();
        if let Some(xname) = name.strip_prefix('@') {
            return self.push_term(value, Property::XProp, negate, xname);
        }
        match Property::from_name(name) {
            Some(prop) => self.push_term(value, prop, negate, ""),
            // Unrecognized property names degrade to matching the
            // whole group text as a title regex.
            None => self.push_term(inner, Property::Title, false, ""),
        }
    }

    /// Evaluate the pattern against a focusable. Exhausted patterns
    /// never match; so do patterns in error state.
    #[must_use]
    pub fn matches(&self, target: Focusable, store: &WindowStore, ctx: &MatchContext) -> bool {
        if self.match_limit > 0 && self.match_count >= self.match_limit {
            return false;
        }
        if self.terms.is_empty() {
            return false;
        }
        self.terms
            .iter()
            .all(|term| term_matches(term, target, store, ctx))
    }

    /// Record one use of this pattern. Counting is driven by callers,
    /// never by `matches` itself.
    pub fn add_match(&mut self) {
        self.match_count += 1;
    }

    pub fn remove_match(&mut self) {
        self.match_count = self.match_count.saturating_sub(1);
    }

    pub fn reset_matches(&mut self) {
        self.match_count = 0;
    }

    #[must_use]
    pub fn match_count(&self) -> u32 {
        self.match_count
    }

    #[must_use]
    pub fn match_limit(&self) -> u32 {
        self.match_limit
    }
}

impl fmt::Display for ClientPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in &self.terms {
            let op = if term.negate { "!=" } else { "=" };
            if term.prop == Property::XProp {
                write!(f, "(@{}{op}{})", term.xprop_name, term.source)?;
            } else {
                write!(f, "({}{op}{})", term.prop.name(), term.source)?;
            }
        }
        if self.match_limit > 0 {
            write!(f, "{{{}}}", self.match_limit)?;
        }
        Ok(())
    }
}

fn term_matches(term: &Term, target: Focusable, store: &WindowStore, ctx: &MatchContext) -> bool {
    if term.prop == Property::XProp {
        let hit = store
            .resolve_client(target)
            .and_then(|c| store.client(c))
            .and_then(|c| c.x_properties.get(&term.xprop_name))
            .is_some_and(|v| {
                v.text.as_deref().is_some_and(|t| term.regex.is_match(t))
                    || v.num.is_some_and(|n| term.regex.is_match(&n.to_string()))
            });
        return hit != term.negate;
    }
    if term.source == "[current]" {
        return match term.prop {
            Property::Workspace => {
                let ws = store.owning_window(target).map(|w| w.workspace);
                (ws == Some(ctx.current_workspace)) != term.negate
            }
            Property::WorkspaceName => {
                // Hard non-match when the context has no current
                // workspace, regardless of negation.
                let Some(current) = ctx.workspace_names.get(ctx.current_workspace) else {
                    return false;
                };
                let name = Property::WorkspaceName.project(target, store, ctx);
                (&name == current) != term.negate
            }
            prop => {
                // Same hard short-circuit when nothing is focused.
                let Some(focused) = ctx.focused else {
                    return false;
                };
                let own = prop.project(target, store, ctx);
                let other = prop.project(focused, store, ctx);
                (own == other) != term.negate
            }
        };
    }
    if term.source == "[mouse]" && term.prop == Property::Head {
        let head = store.owning_window(target).map(|w| w.head);
        return (head == Some(ctx.pointer_head)) != term.negate;
    }
    term.regex.is_match(&term.prop.project(target, store, ctx)) != term.negate
}

/// Take everything up to the next unescaped `)`, unescaping `\(` and
/// `\)` on the way. Returns the inner text and the remainder after the
/// close.
fn take_until_close(s: &str) -> Option<(String, &str)> {
    let mut out = String::new();
    let mut chars = s.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, c @ ('(' | ')'))) => out.push(c),
                Some((_, c)) => {
                    out.push('\\');
                    out.push(c);
                }
                None => out.push('\\'),
            },
            ')' => return Some((out, &s[i + 1..])),
            _ => out.push(ch),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientId, Rect, WindowId, XProperty};

    struct Rig {
        store: WindowStore,
        screen: Screen,
        client: ClientId,
        window: WindowId,
    }

    fn rig() -> Rig {
        let mut store = WindowStore::new();
        let window = store.insert_window(Rect::new(0, 0, 200, 100));
        let client = store.insert_client("xterm on one");
        store.attach_client(client, window);
        let c = store.client_mut(client).unwrap();
        c.res_class = "XTerm".into();
        c.res_name = "xterm".into();
        c.wm_role = "shell".into();
        Rig {
            store,
            screen: Screen::default(),
            client,
            window,
        }
    }

    #[test]
    fn terms_are_anded_left_to_right() {
        let r = rig();
        let ctx = MatchContext::new(&r.screen, None);
        let target = Focusable::Client(r.client);
        let pat = ClientPattern::new("(class=XTerm)(name=xterm)");
        assert!(pat.matches(target, &r.store, &ctx));
        let pat = ClientPattern::new("(class=XTerm)(name=rxvt)");
        assert!(!pat.matches(target, &r.store, &ctx));
    }

    #[test]
    fn negated_term_inverts_the_regex() {
        let r = rig();
        let ctx = MatchContext::new(&r.screen, None);
        let target = Focusable::Client(r.client);
        assert!(!ClientPattern::new("(class!=XTerm)").matches(target, &r.store, &ctx));
        assert!(ClientPattern::new("(class!=Firefox)").matches(target, &r.store, &ctx));
    }

    #[test]
    fn bare_text_matches_the_title() {
        let r = rig();
        let ctx = MatchContext::new(&r.screen, None);
        let pat = ClientPattern::new("(xterm.*)");
        assert!(pat.matches(Focusable::Client(r.client), &r.store, &ctx));
    }

    #[test]
    fn unknown_property_degrades_to_a_literal_title_match() {
        let mut r = rig();
        r.store.client_mut(r.client).unwrap().title = "bogus=xterm".into();
        let ctx = MatchContext::new(&r.screen, None);
        let pat = ClientPattern::new("(bogus=xterm)");
        assert!(!pat.error());
        assert!(pat.matches(Focusable::Client(r.client), &r.store, &ctx));
    }

    #[test]
    fn empty_or_unparseable_pattern_is_error_and_never_matches() {
        let r = rig();
        let ctx = MatchContext::new(&r.screen, None);
        for src in ["", "   ", "(class=XTerm", "(class=*bad)", "junk"] {
            let pat = ClientPattern::new(src);
            assert!(pat.error(), "{src:?} should be an error");
            assert!(!pat.matches(Focusable::Client(r.client), &r.store, &ctx));
        }
    }

    #[test]
    fn parse_failure_discards_all_terms() {
        let pat = ClientPattern::new("(class=XTerm)(title=*bad)");
        assert!(pat.error());
        assert_eq!(pat.to_string(), "");
    }

    #[test]
    fn limit_with_trailing_garbage_is_an_error() {
        assert!(ClientPattern::new("(class=XTerm){2}x").error());
        assert!(ClientPattern::new("(class=XTerm){0}").error());
        assert!(!ClientPattern::new("(class=XTerm){2}").error());
    }

    #[test]
    fn match_limit_exhaustion_is_driven_externally() {
        let r = rig();
        let ctx = MatchContext::new(&r.screen, None);
        let target = Focusable::Client(r.client);
        let mut pat = ClientPattern::new("(class=XTerm){2}");
        assert!(pat.matches(target, &r.store, &ctx));
        pat.add_match();
        assert!(pat.matches(target, &r.store, &ctx));
        pat.add_match();
        assert!(!pat.matches(target, &r.store, &ctx));
        pat.reset_matches();
        assert!(pat.matches(target, &r.store, &ctx));
    }

    #[test]
    fn equality_is_structural_on_terms() {
        let a = ClientPattern::new("(class=XTerm)(title=shell)");
        let mut b = ClientPattern::new("(class=XTerm)(title=shell)");
        assert_eq!(a, b);
        b.add_term("yes", Property::Stuck, false, None);
        assert_ne!(a, b);
        // Same regex semantics, different source text: not equal.
        let c = ClientPattern::new("(class=(?:XTerm))(title=shell)");
        assert_ne!(a, c);
    }

    #[test]
    fn current_workspace_sentinel_compares_against_context() {
        let mut r = rig();
        let target = Focusable::Client(r.client);
        let pat = ClientPattern::new("(workspace=[current])");
        let ctx = MatchContext::new(&r.screen, None);
        assert!(pat.matches(target, &r.store, &ctx));
        r.screen.current_workspace = 2;
        let ctx = MatchContext::new(&r.screen, None);
        assert!(!pat.matches(target, &r.store, &ctx));
    }

    #[test]
    fn current_workspacename_without_context_is_a_hard_non_match() {
        let mut r = rig();
        r.screen.current_workspace = 99; // no such name
        let ctx = MatchContext::new(&r.screen, None);
        // Even negated: missing context short-circuits to false.
        assert!(!ClientPattern::new("(workspacename=[current])")
            .matches(Focusable::Client(r.client), &r.store, &ctx));
        assert!(!ClientPattern::new("(workspacename!=[current])")
            .matches(Focusable::Client(r.client), &r.store, &ctx));
    }

    #[test]
    fn current_class_compares_against_the_focused_window() {
        let mut r = rig();
        let other_win = r.store.insert_window(Rect::new(0, 0, 50, 50));
        let other = r.store.insert_client("other");
        r.store.attach_client(other, other_win);
        r.store.client_mut(other).unwrap().res_class = "XTerm".into();
        let pat = ClientPattern::new("(class=[current])");
        let target = Focusable::Client(r.client);

        // No focused window: hard non-match.
        let ctx = MatchContext::new(&r.screen, None);
        assert!(!pat.matches(target, &r.store, &ctx));

        let ctx = MatchContext::new(&r.screen, Some(Focusable::Client(other)));
        assert!(pat.matches(target, &r.store, &ctx));

        r.store.client_mut(other).unwrap().res_class = "Firefox".into();
        let ctx = MatchContext::new(&r.screen, Some(Focusable::Client(other)));
        assert!(!pat.matches(target, &r.store, &ctx));
    }

    #[test]
    fn mouse_sentinel_matches_the_head_under_the_pointer() {
        let mut r = rig();
        r.store.window_mut(r.window).unwrap().head = 1;
        r.screen.pointer = (10, 10);
        let ctx = MatchContext::new(&r.screen, None);
        assert!(ClientPattern::new("(head=[mouse])").matches(
            Focusable::Client(r.client),
            &r.store,
            &ctx
        ));
        r.screen.pointer = (-10, -10); // off any head
        let ctx = MatchContext::new(&r.screen, None);
        assert!(!ClientPattern::new("(head=[mouse])").matches(
            Focusable::Client(r.client),
            &r.store,
            &ctx
        ));
    }

    #[test]
    fn xprop_matches_text_or_decimal_value() {
        let mut r = rig();
        r.store.client_mut(r.client).unwrap().x_properties.insert(
            "_NET_WM_PID".into(),
            XProperty {
                text: None,
                num: Some(4242),
            },
        );
        let ctx = MatchContext::new(&r.screen, None);
        let target = Focusable::Client(r.client);
        assert!(ClientPattern::new("(@_NET_WM_PID=4242)").matches(target, &r.store, &ctx));
        assert!(!ClientPattern::new("(@_NET_WM_PID=9)").matches(target, &r.store, &ctx));
        // Unresolvable property never matches, negation still applies.
        assert!(!ClientPattern::new("(@NO_SUCH=.*)").matches(target, &r.store, &ctx));
        assert!(ClientPattern::new("(@NO_SUCH!=.*)").matches(target, &r.store, &ctx));
    }

    #[test]
    fn state_properties_project_no_without_an_owning_window() {
        let mut r = rig();
        let orphan = r.store.insert_client("orphan");
        let ctx = MatchContext::new(&r.screen, None);
        assert_eq!(
            Property::Stuck.project(Focusable::Client(orphan), &r.store, &ctx),
            "no"
        );
        r.store.window_mut(r.window).unwrap().stuck = true;
        assert_eq!(
            Property::Stuck.project(Focusable::Client(r.client), &r.store, &ctx),
            "yes"
        );
    }

    #[test]
    fn display_round_trips_the_grammar() {
        let src = "(class=XTerm)(title!=log)(@_NET_WM_PID=42){3}";
        let pat = ClientPattern::new(src);
        assert_eq!(pat.to_string(), src);
        assert_eq!(ClientPattern::new(&pat.to_string()), pat);
    }
}
