//! The `{"estado", "datos", "mensaje"}` body every endpoint answers with.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Estado {
    Exito,
    Error,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub estado: Estado,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datos: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(datos: T) -> Self {
        Self {
            estado: Estado::Exito,
            datos: Some(datos),
            mensaje: None,
        }
    }
}

impl Envelope<()> {
    pub fn message(mensaje: impl Into<String>) -> Self {
        Self {
            estado: Estado::Exito,
            datos: None,
            mensaje: Some(mensaje.into()),
        }
    }

    pub fn error(mensaje: impl Into<String>) -> Self {
        Self {
            estado: Estado::Error,
            datos: None,
            mensaje: Some(mensaje.into()),
        }
    }
}

pub fn ok<T: Serialize>(datos: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::data(datos))
}

pub fn created<T: Serialize>(datos: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope::data(datos))
}

pub fn done(status: StatusCode, mensaje: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(Envelope::message(mensaje))
}

pub fn failure(status: StatusCode, mensaje: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(Envelope::error(mensaje))
}
