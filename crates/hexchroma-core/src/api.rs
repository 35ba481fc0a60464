//! Response payloads shared by the HTTP routes and the CLI one-shot commands.
//!
//! Field names are the wire contract the service has always spoken
//! (`rgb_array`, `complementar_hex`, `paleta`, ...), so they are kept verbatim.

use crate::codec::{HexColor, encode};
use crate::ops::{self, SUGGESTED_NAMES};
use serde::Serialize;

/// Operation routes, without the leading slash.
pub const ROUTE_HEX_TO_RGB: &str = "hex_para_rgb";
pub const ROUTE_COMPLEMENTARY: &str = "calcular_complementar";
pub const ROUTE_TRIADIC: &str = "gerar_paleta_triadica";
pub const ROUTE_NAME: &str = "obter_nome_cor";

/// Every route that requires the `hex` parameter, in documentation order.
pub const COLOR_ROUTES: [&str; 4] = [
    ROUTE_HEX_TO_RGB,
    ROUTE_COMPLEMENTARY,
    ROUTE_TRIADIC,
    ROUTE_NAME,
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HexToRgbPayload {
    pub hex: String,
    pub rgb: String,
    pub rgb_array: [u8; 3],
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComplementaryPayload {
    pub original_hex: String,
    pub complementar_hex: String,
    pub complementar_rgb: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TriadicPayload {
    pub base_hex: String,
    pub paleta: [String; 3],
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NamePayload {
    pub hex: String,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NameMissPayload {
    pub hex: String,
    pub tip: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FallbackPayload {
    pub available_methods: [&'static str; 4],
    pub example_usage: String,
}

pub fn hex_to_rgb(hex: HexColor) -> HexToRgbPayload {
    let rgb = ops::to_rgb(hex);
    HexToRgbPayload {
        hex: hex.prefixed(),
        rgb: rgb.to_string(),
        rgb_array: rgb.to_array(),
    }
}

pub fn complementary(hex: HexColor) -> ComplementaryPayload {
    let comp = ops::complementary(hex);
    ComplementaryPayload {
        original_hex: hex.prefixed(),
        complementar_hex: encode(comp).prefixed(),
        complementar_rgb: comp.to_string(),
    }
}

pub fn triadic(hex: HexColor) -> TriadicPayload {
    let [base, second, third] = ops::triadic_palette(hex);
    TriadicPayload {
        base_hex: hex.prefixed(),
        paleta: [
            encode(base).prefixed(),
            encode(second).prefixed(),
            encode(third).prefixed(),
        ],
    }
}

/// `Ok` on a table hit, `Err` with a suggestion tip on a miss.
pub fn name(hex: HexColor) -> Result<NamePayload, NameMissPayload> {
    match ops::lookup_name(hex) {
        Some(name) => Ok(NamePayload {
            hex: hex.prefixed(),
            name,
        }),
        None => Err(NameMissPayload {
            hex: hex.prefixed(),
            tip: format!(
                "Try one of the known codes: {}.",
                SUGGESTED_NAMES.join(", ")
            ),
        }),
    }
}

/// One operation entry of the `/docs` discovery document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EndpointDoc {
    pub route: String,
    pub method: &'static str,
    pub required_parameters: &'static str,
    pub example_url: String,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocsPayload {
    pub name: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointDoc>,
    pub note: &'static str,
}

const HEX_PARAMETER: &str = "hex (3- or 6-digit HEX color code)";

/// Build the discovery document with absolute example URLs under `base_url`.
pub fn docs(base_url: &str) -> DocsPayload {
    let entry = |route: &str, example: &str, description: &'static str| EndpointDoc {
        route: format!("/{route}"),
        method: "GET",
        required_parameters: HEX_PARAMETER,
        example_url: format!("{base_url}/{route}?hex={example}"),
        description,
    };
    DocsPayload {
        name: "hexchroma color analysis and palette API",
        description: "Utilities for converting and manipulating HEX color codes.",
        endpoints: vec![
            entry(
                ROUTE_HEX_TO_RGB,
                "1E90FF",
                "Convert a HEX color code to its RGB equivalent.",
            ),
            entry(
                ROUTE_COMPLEMENTARY,
                "FF0000",
                "Compute the complementary (inverted) color of a HEX code.",
            ),
            entry(
                ROUTE_TRIADIC,
                "00FF00",
                "Generate a three-color triadic palette by rotating the hue of the given color.",
            ),
            entry(
                ROUTE_NAME,
                "4682B4",
                "Look up a descriptive name for the HEX code in a small built-in table.",
            ),
        ],
        note: "Every HEX code may be passed with or without the leading '#' (encode it as %23).",
    }
}

pub fn fallback(base_url: &str) -> FallbackPayload {
    FallbackPayload {
        available_methods: COLOR_ROUTES,
        example_usage: format!("{base_url}/{ROUTE_HEX_TO_RGB}?hex=1E90FF"),
    }
}
