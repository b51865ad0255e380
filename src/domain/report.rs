//! The read-only report catalog.
//!
//! Every report is one `pkg_reportes` procedure taking zero or more
//! positional inputs followed by an INOUT refcursor. Inputs come from the
//! query string and are typed here, before any database work.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};

use super::errors::DomainError;

pub type ReportRow = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Required,
    Integer(i32),
    CurrentYear,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: ParamDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportShape {
    /// Array of rows.
    Many,
    /// First row as an object, `null` when the cursor is empty.
    Single,
}

#[derive(Debug, Clone, Copy)]
pub struct ReportSpec {
    pub slug: &'static str,
    pub procedure: &'static str,
    pub params: &'static [ParamSpec],
    pub shape: ReportShape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportParam {
    Integer(i32),
    Date(NaiveDate),
}

impl ReportParam {
    /// Cast appended to the placeholder so procedure resolution is unambiguous.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ReportParam::Integer(_) => "integer",
            ReportParam::Date(_) => "date",
        }
    }
}

const NO_PARAMS: &[ParamSpec] = &[];

pub const CATALOG: &[ReportSpec] = &[
    ReportSpec {
        slug: "proveedores-activos",
        procedure: "pkg_reportes.p_reporte_proveedores_activos",
        params: NO_PARAMS,
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "inventario",
        procedure: "pkg_reportes.p_reporte_inventario",
        params: NO_PARAMS,
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "medicamentos-por-categoria",
        procedure: "pkg_reportes.p_reporte_medicamentos_por_categoria",
        params: NO_PARAMS,
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "rentabilidad",
        procedure: "pkg_reportes.p_reporte_rentabilidad",
        params: NO_PARAMS,
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "bajo-stock",
        procedure: "pkg_reportes.p_reporte_bajo_stock",
        params: &[ParamSpec {
            name: "umbral",
            kind: ParamKind::Integer,
            default: ParamDefault::Integer(10),
        }],
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "sin-stock",
        procedure: "pkg_reportes.p_reporte_sin_stock",
        params: NO_PARAMS,
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "inactivos",
        procedure: "pkg_reportes.p_reporte_inactivos",
        params: NO_PARAMS,
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "vencimientos",
        procedure: "pkg_reportes.p_reporte_vencimientos",
        params: &[ParamSpec {
            name: "dias",
            kind: ParamKind::Integer,
            default: ParamDefault::Integer(30),
        }],
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "ventas-por-empleado",
        procedure: "pkg_reportes.p_reporte_ventas_por_empleado",
        params: NO_PARAMS,
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "clientes-frecuentes",
        procedure: "pkg_reportes.p_reporte_clientes_frecuentes",
        params: &[ParamSpec {
            name: "limite",
            kind: ParamKind::Integer,
            default: ParamDefault::Integer(10),
        }],
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "top-vendidos",
        procedure: "pkg_reportes.p_reporte_top_vendidos",
        params: &[ParamSpec {
            name: "limite",
            kind: ParamKind::Integer,
            default: ParamDefault::Integer(10),
        }],
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "ingresos-mensuales",
        procedure: "pkg_reportes.p_reporte_ingresos_mensuales",
        params: &[ParamSpec {
            name: "anio",
            kind: ParamKind::Integer,
            default: ParamDefault::CurrentYear,
        }],
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "ventas-por-periodo",
        procedure: "pkg_reportes.p_reporte_ventas_por_periodo",
        params: &[
            ParamSpec {
                name: "desde",
                kind: ParamKind::Date,
                default: ParamDefault::Required,
            },
            ParamSpec {
                name: "hasta",
                kind: ParamKind::Date,
                default: ParamDefault::Required,
            },
        ],
        shape: ReportShape::Many,
    },
    ReportSpec {
        slug: "resumen-general",
        procedure: "pkg_reportes.p_resumen_general",
        params: NO_PARAMS,
        shape: ReportShape::Single,
    },
];

impl ReportSpec {
    pub fn find(slug: &str) -> Option<&'static ReportSpec> {
        CATALOG.iter().find(|spec| spec.slug == slug)
    }

    /// Resolve the procedure's positional inputs from the query string.
    pub fn bind_params(
        &self,
        query: &HashMap<String, String>,
        today: NaiveDate,
    ) -> Result<Vec<ReportParam>, DomainError> {
        self.params
            .iter()
            .map(|param| {
                let raw = query.get(param.name).map(|v| v.trim()).filter(|v| !v.is_empty());
                match (raw, param.default) {
                    (Some(raw), _) => parse_param(param, raw),
                    (None, ParamDefault::Integer(v)) => Ok(ReportParam::Integer(v)),
                    (None, ParamDefault::CurrentYear) => Ok(ReportParam::Integer(today.year())),
                    (None, ParamDefault::Required) => Err(DomainError::InvalidInput(format!(
                        "Falta el parámetro requerido '{}'.",
                        param.name
                    ))),
                }
            })
            .collect()
    }
}

fn parse_param(param: &ParamSpec, raw: &str) -> Result<ReportParam, DomainError> {
    match param.kind {
        ParamKind::Integer => raw.parse::<i32>().map(ReportParam::Integer).map_err(|_| {
            DomainError::InvalidInput(format!(
                "El parámetro '{}' debe ser un número entero.",
                param.name
            ))
        }),
        ParamKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(ReportParam::Date)
            .map_err(|_| {
                DomainError::InvalidInput(format!(
                    "El parámetro '{}' debe ser una fecha AAAA-MM-DD.",
                    param.name
                ))
            }),
    }
}

/// Key a cursor row by lower-cased column name, keeping column order.
pub fn normalize_row(row: Value) -> ReportRow {
    match row {
        Value::Object(columns) => columns
            .into_iter()
            .map(|(name, value)| (name.to_lowercase(), value))
            .collect(),
        other => {
            let mut single = Map::new();
            single.insert("valor".to_string(), other);
            single
        }
    }
}

pub fn shape_rows(rows: Vec<ReportRow>, shape: ReportShape) -> Value {
    match shape {
        ReportShape::Many => Value::Array(rows.into_iter().map(Value::Object).collect()),
        ReportShape::Single => rows
            .into_iter()
            .next()
            .map(Value::Object)
            .unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn slugs_are_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert_ne!(a.slug, b.slug);
            }
        }
    }

    #[test]
    fn unknown_slug_is_absent() {
        assert!(ReportSpec::find("no-existe").is_none());
        assert!(ReportSpec::find("inventario").is_some());
    }

    #[test]
    fn defaults_fill_missing_params() {
        let spec = ReportSpec::find("vencimientos").unwrap();
        let params = spec.bind_params(&HashMap::new(), today()).unwrap();
        assert_eq!(params, vec![ReportParam::Integer(30)]);

        let spec = ReportSpec::find("ingresos-mensuales").unwrap();
        let params = spec.bind_params(&HashMap::new(), today()).unwrap();
        assert_eq!(params, vec![ReportParam::Integer(2025)]);
    }

    #[test]
    fn provided_params_override_defaults() {
        let spec = ReportSpec::find("bajo-stock").unwrap();
        let params = spec.bind_params(&query(&[("umbral", "5")]), today()).unwrap();
        assert_eq!(params, vec![ReportParam::Integer(5)]);
    }

    #[test]
    fn dates_are_parsed_in_order() {
        let spec = ReportSpec::find("ventas-por-periodo").unwrap();
        let params = spec
            .bind_params(&query(&[("hasta", "2025-01-31"), ("desde", "2025-01-01")]), today())
            .unwrap();
        assert_eq!(
            params,
            vec![
                ReportParam::Date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
                ReportParam::Date(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()),
            ]
        );
    }

    #[test]
    fn required_and_malformed_params_are_rejected() {
        let spec = ReportSpec::find("ventas-por-periodo").unwrap();
        assert!(spec.bind_params(&query(&[("desde", "2025-01-01")]), today()).is_err());
        assert!(spec
            .bind_params(&query(&[("desde", "01/01/2025"), ("hasta", "2025-01-31")]), today())
            .is_err());

        let spec = ReportSpec::find("top-vendidos").unwrap();
        assert!(spec.bind_params(&query(&[("limite", "diez")]), today()).is_err());
    }

    #[test]
    fn normalize_lowercases_and_keeps_column_order() {
        let row = normalize_row(json!({"NOMBRE": "Paracetamol", "Stock": 4, "lote": "L1"}));
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["nombre", "stock", "lote"]);
        assert_eq!(row["stock"], json!(4));
    }

    #[test]
    fn single_shape_takes_first_row_or_null() {
        let rows = vec![
            normalize_row(json!({"total_clientes": 3})),
            normalize_row(json!({"total_clientes": 9})),
        ];
        assert_eq!(
            shape_rows(rows, ReportShape::Single),
            json!({"total_clientes": 3})
        );
        assert_eq!(shape_rows(vec![], ReportShape::Single), Value::Null);
        assert_eq!(shape_rows(vec![], ReportShape::Many), json!([]));
    }
}
