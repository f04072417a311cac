use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::model::Mod;

/// Characters left alone by URI-component encoding.
pub const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Mod(String),
}

impl Route {
    /// Parses a hash route. Accepts a bare fragment (`#/mod/x`), a fragment
    /// without the leading marker (`mod/x`) or a full URL carrying one.
    pub fn parse(input: &str) -> Self {
        let hash = match input.find('#') {
            Some(pos) => &input[pos..],
            None => input,
        };
        let hash = hash.strip_prefix("#/").unwrap_or(hash);
        match hash.strip_prefix("mod/") {
            Some(raw_id) => {
                let id = percent_decode_str(raw_id)
                    .decode_utf8()
                    .map(|id| id.into_owned())
                    .unwrap_or_else(|_| raw_id.to_string());
                Route::Mod(id)
            }
            None => Route::List,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Route::List => write!(f, "#/"),
            Route::Mod(id) => write!(f, "#/mod/{}", encode_component(id)),
        }
    }
}

/// What a route resolves to against the currently loaded mods.
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    List(&'a [Mod]),
    Detail(&'a Mod),
    NotFound(&'a str),
}

pub fn resolve<'a>(route: &'a Route, mods: &'a [Mod]) -> View<'a> {
    match route {
        Route::List => View::List(mods),
        Route::Mod(id) => match mods.iter().find(|m| &m.id == id) {
            Some(found) => View::Detail(found),
            None => View::NotFound(id),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> Mod {
        Mod {
            id: id.to_string(),
            name: id.to_uppercase(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_and_root_hashes_are_the_list() {
        assert_eq!(Route::parse(""), Route::List);
        assert_eq!(Route::parse("#"), Route::List);
        assert_eq!(Route::parse("#/"), Route::List);
        assert_eq!(Route::parse("#/somewhere/else"), Route::List);
        assert_eq!(Route::parse("#mod/x"), Route::List);
    }

    #[test]
    fn mod_routes_are_decoded() {
        assert_eq!(Route::parse("#/mod/speedy"), Route::Mod("speedy".into()));
        assert_eq!(
            Route::parse("#/mod/big%20wheels"),
            Route::Mod("big wheels".into())
        );
        assert_eq!(Route::parse("mod/plain"), Route::Mod("plain".into()));
        assert_eq!(
            Route::parse("https://site/mods.html#/mod/a%2Fb"),
            Route::Mod("a/b".into())
        );
        assert_eq!(Route::parse("#/mod/"), Route::Mod(String::new()));
    }

    #[test]
    fn malformed_encoding_keeps_raw_text() {
        assert_eq!(Route::parse("#/mod/%FF%FE"), Route::Mod("%FF%FE".into()));
    }

    #[test]
    fn display_encodes_ids() {
        assert_eq!(Route::List.to_string(), "#/");
        let route = Route::Mod("big wheels+1".into());
        assert_eq!(route.to_string(), "#/mod/big%20wheels%2B1");
        assert_eq!(Route::parse(&route.to_string()), route);
    }

    #[test]
    fn unknown_id_resolves_to_not_found() {
        let mods = vec![sample("a"), sample("b")];
        let route = Route::Mod("zzz".into());
        assert!(matches!(resolve(&route, &mods), View::NotFound("zzz")));
        let route = Route::Mod("b".into());
        match resolve(&route, &mods) {
            View::Detail(m) => assert_eq!(m.name, "B"),
            other => panic!("unexpected view {other:?}"),
        }
        assert!(matches!(resolve(&Route::List, &[]), View::List(m) if m.is_empty()));
    }
}
