//! schema.org JSON-LD documents for the public pages.

use serde_json::{json, Value};

use crate::config::BusinessConfig;
use crate::dto::seo_dto::{Breadcrumb, FaqEntry, ServiceOffering};

const CONTEXT: &str = "https://schema.org";

fn postal_address(business: &BusinessConfig) -> Value {
    json!({
        "@type": "PostalAddress",
        "streetAddress": business.street_address,
        "addressLocality": business.locality,
        "addressRegion": business.region,
        "postalCode": business.postal_code,
        "addressCountry": business.country,
    })
}

fn provider(business: &BusinessConfig) -> Value {
    json!({
        "@type": "LocalBusiness",
        "name": business.name,
        "url": business.url,
        "telephone": business.phone,
    })
}

pub fn local_business(business: &BusinessConfig) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "LocalBusiness",
        "@id": format!("{}#business", business.url.trim_end_matches('/')),
        "name": business.name,
        "description": business.description,
        "url": business.url,
        "telephone": business.phone,
        "email": business.email,
        "priceRange": business.price_range,
        "address": postal_address(business),
        "openingHours": business.opening_hours,
        "areaServed": business.area_served,
    })
}

pub fn service(business: &BusinessConfig, offering: &ServiceOffering) -> Value {
    let mut doc = json!({
        "@context": CONTEXT,
        "@type": "Service",
        "name": offering.name,
        "description": offering.description,
        "url": business.absolute_url(&offering.url),
        "provider": provider(business),
        "areaServed": business.area_served,
    });
    if let Some(service_type) = &offering.service_type {
        doc["serviceType"] = json!(service_type);
    }
    doc
}

pub fn faq(entries: &[FaqEntry]) -> Value {
    let questions: Vec<Value> = entries
        .iter()
        .map(|entry| {
            json!({
                "@type": "Question",
                "name": entry.question,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": entry.answer,
                },
            })
        })
        .collect();

    json!({
        "@context": CONTEXT,
        "@type": "FAQPage",
        "mainEntity": questions,
    })
}

pub fn breadcrumbs(business: &BusinessConfig, items: &[Breadcrumb]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": item.name,
                "item": business.absolute_url(&item.path),
            })
        })
        .collect();

    json!({
        "@context": CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

/// Wraps a document in a script tag for embedding in page markup.
pub fn to_script_tag(doc: &Value) -> String {
    // "</" inside the JSON would close the script element early
    let body = doc.to_string().replace("</", "<\\/");
    format!("<script type=\"application/ld+json\">{}</script>", body)
}
