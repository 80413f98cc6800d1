use crate::FluidProperties;

/// Built-in propellant entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidCatalogEntry {
    pub canonical_id: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
    pub h_fg_j_per_kg: f64,
    pub t_sat_k: f64,
    pub rho_liquid_kg_m3: f64,
    pub c_liquid_j_per_kg_k: f64,
    pub cp_j_per_kg_k: f64,
}

impl FluidCatalogEntry {
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.canonical_id.to_ascii_lowercase().contains(&query)
            || self.display_name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }

    /// Exact, case-insensitive match on the id or one of the aliases.
    pub fn is_named(&self, name: &str) -> bool {
        let name = name.trim();
        self.canonical_id.eq_ignore_ascii_case(name)
            || self.display_name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    pub fn properties(&self) -> FluidProperties {
        FluidProperties {
            name: self.canonical_id.to_string(),
            h_fg_j_per_kg: self.h_fg_j_per_kg,
            t_sat_k: self.t_sat_k,
            rho_liquid_kg_m3: self.rho_liquid_kg_m3,
            c_liquid_j_per_kg_k: self.c_liquid_j_per_kg_k,
            cp_j_per_kg_k: self.cp_j_per_kg_k,
        }
    }
}

// Normal boiling point values; densities near 20 °C for storables.
const BUILTIN_CATALOG: [FluidCatalogEntry; 6] = [
    FluidCatalogEntry {
        canonical_id: "water",
        display_name: "Water",
        aliases: &["h2o"],
        h_fg_j_per_kg: 2.257e6,
        t_sat_k: 373.15,
        rho_liquid_kg_m3: 997.0,
        c_liquid_j_per_kg_k: 4181.0,
        cp_j_per_kg_k: 2010.0,
    },
    FluidCatalogEntry {
        canonical_id: "rp1",
        display_name: "RP-1",
        aliases: &["rp-1", "kerosene", "jet-a"],
        h_fg_j_per_kg: 2.46e5,
        t_sat_k: 489.0,
        rho_liquid_kg_m3: 810.0,
        c_liquid_j_per_kg_k: 2010.0,
        cp_j_per_kg_k: 1670.0,
    },
    FluidCatalogEntry {
        canonical_id: "ethanol",
        display_name: "Ethanol",
        aliases: &["c2h5oh", "etoh"],
        h_fg_j_per_kg: 8.41e5,
        t_sat_k: 351.4,
        rho_liquid_kg_m3: 789.0,
        c_liquid_j_per_kg_k: 2440.0,
        cp_j_per_kg_k: 1420.0,
    },
    FluidCatalogEntry {
        canonical_id: "isopropanol",
        display_name: "Isopropyl Alcohol",
        aliases: &["ipa", "isopropyl alcohol", "2-propanol"],
        h_fg_j_per_kg: 6.64e5,
        t_sat_k: 355.4,
        rho_liquid_kg_m3: 786.0,
        c_liquid_j_per_kg_k: 2680.0,
        cp_j_per_kg_k: 1540.0,
    },
    FluidCatalogEntry {
        canonical_id: "methane",
        display_name: "Liquid Methane",
        aliases: &["ch4", "lch4", "lng"],
        h_fg_j_per_kg: 5.10e5,
        t_sat_k: 111.7,
        rho_liquid_kg_m3: 422.6,
        c_liquid_j_per_kg_k: 3480.0,
        cp_j_per_kg_k: 2220.0,
    },
    FluidCatalogEntry {
        canonical_id: "lox",
        display_name: "Liquid Oxygen",
        aliases: &["o2", "oxygen", "liquid oxygen"],
        h_fg_j_per_kg: 2.13e5,
        t_sat_k: 90.19,
        rho_liquid_kg_m3: 1141.0,
        c_liquid_j_per_kg_k: 1699.0,
        cp_j_per_kg_k: 918.0,
    },
];

pub fn builtin_catalog() -> &'static [FluidCatalogEntry] {
    &BUILTIN_CATALOG
}

pub fn filter_builtin_catalog(query: &str) -> Vec<FluidCatalogEntry> {
    builtin_catalog()
        .iter()
        .copied()
        .filter(|entry| entry.matches_query(query))
        .collect()
}
