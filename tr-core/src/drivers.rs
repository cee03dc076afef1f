//! Driver registry: display names and team colours for known codes

/// Static metadata for one competitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverMeta {
    pub code: &'static str,
    pub name: &'static str,
    /// Team colour as `#RRGGBB`
    pub color: &'static str,
}

/// Colour used for codes missing from the registry
pub const FALLBACK_COLOR: &str = "#EB0029";

const DRIVERS: &[DriverMeta] = &[
    DriverMeta { code: "VER", name: "Max Verstappen",   color: "#3671C6" },
    DriverMeta { code: "PER", name: "Sergio Pérez",     color: "#1E41FF" },
    DriverMeta { code: "LEC", name: "Charles Leclerc",  color: "#E10600" },
    DriverMeta { code: "SAI", name: "Carlos Sainz",     color: "#C00000" },
    DriverMeta { code: "HAM", name: "Lewis Hamilton",   color: "#00D2BE" },
    DriverMeta { code: "RUS", name: "George Russell",   color: "#00A19C" },
    DriverMeta { code: "NOR", name: "Lando Norris",     color: "#FF8000" },
    DriverMeta { code: "PIA", name: "Oscar Piastri",    color: "#FF9B3D" },
    DriverMeta { code: "ALO", name: "Fernando Alonso",  color: "#006F62" },
    DriverMeta { code: "STR", name: "Lance Stroll",     color: "#00594F" },
    DriverMeta { code: "GAS", name: "Pierre Gasly",     color: "#0090FF" },
    DriverMeta { code: "OCO", name: "Esteban Ocon",     color: "#0050FF" },
    DriverMeta { code: "ALB", name: "Alex Albon",       color: "#012564" },
    DriverMeta { code: "SAR", name: "Logan Sargeant",   color: "#013D9F" },
    DriverMeta { code: "BOT", name: "Valtteri Bottas",  color: "#900000" },
    DriverMeta { code: "ZHO", name: "Zhou Guanyu",      color: "#A40000" },
    DriverMeta { code: "TSU", name: "Yuki Tsunoda",     color: "#2B4562" },
    DriverMeta { code: "RIC", name: "Daniel Ricciardo", color: "#1F2041" },
    DriverMeta { code: "MAG", name: "Kevin Magnussen",  color: "#B6BABD" },
    DriverMeta { code: "HUL", name: "Nico Hülkenberg",  color: "#9EA2A6" },
];

pub fn all() -> &'static [DriverMeta] {
    DRIVERS
}

pub fn lookup(code: &str) -> Option<&'static DriverMeta> {
    DRIVERS.iter().find(|d| d.code.eq_ignore_ascii_case(code))
}

/// Full name for a code, or the code itself when unknown
pub fn display_name(code: &str) -> &str {
    lookup(code).map(|d| d.name).unwrap_or(code)
}

pub fn color(code: &str) -> &'static str {
    lookup(code).map(|d| d.color).unwrap_or(FALLBACK_COLOR)
}
