use std::collections::BTreeMap;
use std::fmt;

/// Raw parse of a hash fragment: route name plus query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub params: BTreeMap<String, String>,
}

impl Location {
    /// Parse `#<route>?<key>=<value>&...`. The leading `#` is optional and an
    /// empty name means `map`.
    pub fn parse(hash: &str) -> Self {
        let hash = hash.trim();
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        let (name, query) = match hash.split_once('?') {
            Some((name, query)) => (name, query),
            None => (hash, ""),
        };

        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (decode_component(k), decode_component(v)),
                None => (decode_component(pair), String::new()),
            })
            .collect();

        let name = decode_component(name);
        Self {
            name: if name.is_empty() { "map".to_string() } else { name },
            params,
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Every view the dashboard can show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Map,
    CountryChart { country: String },
    World,
    WorldPopulationRate,
    CountryBirthDeathRate { country: String },
}

impl Route {
    pub const NAMES: [&'static str; 5] = [
        "map",
        "countryChart",
        "world",
        "worldPopulationRate",
        "country-birth-death-rate-chart",
    ];

    /// Typed route for a location, or `None` when the name is unknown or a
    /// required parameter is missing.
    pub fn from_location(location: &Location) -> Option<Self> {
        let country = || {
            location
                .param("country")
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
        };

        match location.name.as_str() {
            "map" => Some(Route::Map),
            "countryChart" => country().map(|country| Route::CountryChart { country }),
            "world" => Some(Route::World),
            "worldPopulationRate" => Some(Route::WorldPopulationRate),
            "country-birth-death-rate-chart" => {
                country().map(|country| Route::CountryBirthDeathRate { country })
            }
            _ => None,
        }
    }

    pub fn parse(hash: &str) -> Option<Self> {
        Self::from_location(&Location::parse(hash))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Map => "map",
            Route::CountryChart { .. } => "countryChart",
            Route::World => "world",
            Route::WorldPopulationRate => "worldPopulationRate",
            Route::CountryBirthDeathRate { .. } => "country-birth-death-rate-chart",
        }
    }

    /// Country this route is about, if any
    pub fn country(&self) -> Option<&str> {
        match self {
            Route::CountryChart { country } | Route::CountryBirthDeathRate { country } => {
                Some(country)
            }
            _ => None,
        }
    }

    pub fn to_hash(&self) -> String {
        match self.country() {
            Some(country) => format!("#{}?country={}", self.name(), urlencoding::encode(country)),
            None => format!("#{}", self.name()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hash())
    }
}

/// Outcome of a navigation: the view to build (if any) and the generation that
/// identifies this navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatch {
    pub generation: u64,
    pub hash: String,
    pub route: Option<Route>,
}

/// Single-level hash router with a back stack.
///
/// Every navigation bumps `generation`; work started for an older generation
/// must be dropped when it completes.
#[derive(Default)]
pub struct Router {
    generation: u64,
    current: Option<String>,
    history: Vec<String>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&mut self, hash: &str) -> Dispatch {
        if let Some(prev) = self.current.take() {
            self.history.push(prev);
        }
        self.dispatch(hash)
    }

    /// Return to the previous location, if there is one
    pub fn back(&mut self) -> Option<Dispatch> {
        let prev = self.history.pop()?;
        Some(self.dispatch(&prev))
    }

    /// Re-run the current location as a fresh navigation (no history entry)
    pub fn reload(&mut self) -> Option<Dispatch> {
        let current = self.current.take()?;
        Some(self.dispatch(&current))
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_hash(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    fn dispatch(&mut self, hash: &str) -> Dispatch {
        self.generation += 1;
        let location = Location::parse(hash);
        let route = Route::from_location(&location);
        let hash = match &route {
            Some(route) => route.to_hash(),
            None => format!("#{}", location.name),
        };
        self.current = Some(hash.clone());
        Dispatch {
            generation: self.generation,
            hash,
            route,
        }
    }
}

/// Decode one query component: `+` is a space and `%XX` escapes are
/// decoded. Malformed escapes are kept as-is.
fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}
