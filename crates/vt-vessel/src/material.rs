//! Wall material conductivity table.

use serde::{Deserialize, Serialize};

/// Conductivity used for names not found in the table [W/(m·K)] (plain steel).
pub const DEFAULT_WALL_CONDUCTIVITY: f64 = 46.0;

/// Known vessel wall materials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallMaterial {
    Steel,
    StainlessSteel,
    Glass,
    Plastic,
    Aluminium,
}

impl WallMaterial {
    pub const ALL: [WallMaterial; 5] = [
        WallMaterial::Steel,
        WallMaterial::StainlessSteel,
        WallMaterial::Glass,
        WallMaterial::Plastic,
        WallMaterial::Aluminium,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            WallMaterial::Steel => "steel",
            WallMaterial::StainlessSteel => "stainless_steel",
            WallMaterial::Glass => "glass",
            WallMaterial::Plastic => "plastic",
            WallMaterial::Aluminium => "aluminium",
        }
    }

    /// Thermal conductivity [W/(m·K)].
    pub fn conductivity(&self) -> f64 {
        match self {
            WallMaterial::Steel => 46.0,
            WallMaterial::StainlessSteel => 21.0,
            WallMaterial::Glass => 1.4,
            WallMaterial::Plastic => 0.3,
            WallMaterial::Aluminium => 230.0,
        }
    }
}

impl std::fmt::Display for WallMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for WallMaterial {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "steel" | "carbon_steel" | "carbon steel" | "stahl" => Ok(WallMaterial::Steel),
            "stainless_steel" | "stainless steel" | "stainless-steel" | "stainless"
            | "edelstahl" => Ok(WallMaterial::StainlessSteel),
            "glass" | "borosilicate" | "glas" => Ok(WallMaterial::Glass),
            "plastic" | "kunststoff" => Ok(WallMaterial::Plastic),
            "aluminium" | "aluminum" => Ok(WallMaterial::Aluminium),
            _ => Err("unknown wall material"),
        }
    }
}

/// Conductivity for a material name, falling back to
/// [`DEFAULT_WALL_CONDUCTIVITY`] for unknown names.
pub fn wall_conductivity(name: &str) -> f64 {
    name.parse::<WallMaterial>()
        .map(|m| m.conductivity())
        .unwrap_or(DEFAULT_WALL_CONDUCTIVITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(wall_conductivity("Steel"), 46.0);
        assert_eq!(wall_conductivity("STAINLESS_STEEL"), 21.0);
        assert_eq!(wall_conductivity(" glass "), 1.4);
        assert_eq!(wall_conductivity("Plastic"), 0.3);
    }

    #[test]
    fn both_aluminium_spellings_resolve() {
        assert_eq!(wall_conductivity("aluminium"), 230.0);
        assert_eq!(wall_conductivity("Aluminum"), 230.0);
    }

    #[test]
    fn german_names_resolve() {
        assert_eq!("Stahl".parse::<WallMaterial>(), Ok(WallMaterial::Steel));
        assert_eq!("Edelstahl".parse::<WallMaterial>(), Ok(WallMaterial::StainlessSteel));
        assert_eq!("Glas".parse::<WallMaterial>(), Ok(WallMaterial::Glass));
        assert_eq!("Kunststoff".parse::<WallMaterial>(), Ok(WallMaterial::Plastic));
        assert_eq!(wall_conductivity("Glas"), 1.4);
        assert_eq!(wall_conductivity("edelstahl"), 21.0);
    }

    #[test]
    fn unknown_material_uses_default() {
        assert_eq!(wall_conductivity("unobtainium"), DEFAULT_WALL_CONDUCTIVITY);
        assert_eq!(wall_conductivity(""), DEFAULT_WALL_CONDUCTIVITY);
    }

    #[test]
    fn keys_parse_back() {
        for material in WallMaterial::ALL {
            assert_eq!(material.key().parse::<WallMaterial>(), Ok(material));
        }
    }
}
