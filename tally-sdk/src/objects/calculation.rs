//! Body of `POST /calculo`.

use compact_str::CompactString;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single update submitted for a key.
///
/// Field names follow the established wire format (`ID`, `Valor1`..`Valor3`)
/// and are matched case-insensitively when decoding. Unknown fields are
/// ignored, missing or `null` values decode as `0.0` and a repeated field
/// keeps its last value. The `ID` is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationRequest {
    #[serde(rename = "ID")]
    pub id: CompactString,
    #[serde(rename = "Valor1")]
    pub valor1: f64,
    #[serde(rename = "Valor2")]
    pub valor2: f64,
    #[serde(rename = "Valor3")]
    pub valor3: f64,
}

enum Field {
    Id,
    Valor1,
    Valor2,
    Valor3,
    Other,
}

impl Field {
    fn from_name(name: &str) -> Self {
        const FIELDS: [(&str, Field); 4] = [
            ("id", Field::Id),
            ("valor1", Field::Valor1),
            ("valor2", Field::Valor2),
            ("valor3", Field::Valor3),
        ];
        FIELDS
            .into_iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map_or(Field::Other, |(_, field)| field)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldVisitor;

        impl Visitor<'_> for FieldVisitor {
            type Value = Field;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a field name")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Field, E> {
                Ok(Field::from_name(v))
            }
        }

        deserializer.deserialize_identifier(FieldVisitor)
    }
}

struct RequestVisitor;

impl<'de> Visitor<'de> for RequestVisitor {
    type Value = CalculationRequest;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a calculation request object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut id = None;
        let mut values = [0.0f64; 3];

        while let Some(field) = map.next_key::<Field>()? {
            let slot = match field {
                Field::Id => {
                    id = Some(map.next_value::<CompactString>()?);
                    continue;
                }
                Field::Other => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
                Field::Valor1 => &mut values[0],
                Field::Valor2 => &mut values[1],
                Field::Valor3 => &mut values[2],
            };
            // `null` leaves the value untouched.
            if let Some(v) = map.next_value::<Option<f64>>()? {
                *slot = v;
            }
        }

        let id = id.ok_or_else(|| de::Error::missing_field("ID"))?;
        let [valor1, valor2, valor3] = values;
        Ok(CalculationRequest {
            id,
            valor1,
            valor2,
            valor3,
        })
    }
}

impl<'de> Deserialize<'de> for CalculationRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RequestVisitor)
    }
}
