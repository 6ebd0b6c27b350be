//! Maps ranked results to the fields a list row displays.

use crate::core::distance::format_km;
use crate::domain::model::{Company, DisplayFields, ImageSource, RankedResult};

pub const DEFAULT_IMAGE: &str = "/images/empresas/default.jpg";

const COMPANY_IMAGES: &[(&str, &str)] = &[
    ("Barbearia do João", "/images/empresas/barbearia-do-joao.jpg"),
    ("Salão Beleza Pura", "/images/empresas/salao-beleza-pura.jpg"),
    ("Estética Renovar", "/images/empresas/estetica-renovar.jpg"),
    ("Spa Relaxar", "/images/empresas/spa-relaxar.jpg"),
    ("Clínica Sorrir", "/images/empresas/clinica-sorrir.jpg"),
    ("Academia Força Total", "/images/empresas/academia-forca-total.jpg"),
];

const STREETS: [&str; 5] = [
    "Rua das Flores",
    "Av. Paulista",
    "Rua Augusta",
    "Rua Oscar Freire",
    "Av. Faria Lima",
];

const NEIGHBORHOODS: [&str; 5] = ["Vila Madalena", "Pinheiros", "Jardins", "Moema", "Itaim Bibi"];

/// Image path for an exact company name, or [`DEFAULT_IMAGE`].
pub fn image_for(name: &str) -> &'static str {
    COMPANY_IMAGES
        .iter()
        .find(|(company, _)| *company == name)
        .map(|(_, path)| *path)
        .unwrap_or(DEFAULT_IMAGE)
}

impl ImageSource {
    pub fn for_company(name: &str) -> Self {
        ImageSource::new(image_for(name), DEFAULT_IMAGE)
    }
}

fn bucket(value: f64, modulus: u64) -> u64 {
    ((value * 1000.0).floor().abs() as u64) % modulus
}

/// Illustrative street address derived from the coordinate. Deterministic.
pub fn illustrative_address(company: &Company) -> String {
    let street = STREETS[bucket(company.latitude, STREETS.len() as u64) as usize];
    let neighborhood =
        NEIGHBORHOODS[bucket(company.longitude, NEIGHBORHOODS.len() as u64) as usize];
    let number = bucket(company.latitude + company.longitude, 9999) + 1;

    format!("{street}, {number} - {neighborhood}, São Paulo - SP")
}

pub fn present(result: &RankedResult<'_>) -> DisplayFields {
    let company = result.company;
    DisplayFields {
        slug: company.slug.clone(),
        name: company.name.clone(),
        category: company.category.clone(),
        description: company.description.clone(),
        distance_km: result.distance_km.map(format_km),
        rating: format!("{:.1}", company.rating),
        image: ImageSource::for_company(&company.name),
        address: illustrative_address(company),
    }
}

pub fn present_all(results: &[RankedResult<'_>]) -> Vec<DisplayFields> {
    results.iter().map(present).collect()
}
