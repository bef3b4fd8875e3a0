//! Request bodies for API tests

#![allow(dead_code)]

use serde_json::{json, Value};

pub fn gallery(title: &str, slug: &str) -> Value {
    json!({ "title": title, "slug": slug })
}

pub fn wedding_gallery() -> Value {
    json!({
        "title": "Sarah & John",
        "slug": "wedding-sarah-john",
        "description": "Summer wedding at the lake house",
        "clientName": "Sarah Miller",
        "clientEmail": "sarah@example.com",
        "eventDate": "2025-06-14T15:30:00Z",
        "eventLocation": "Lake Como",
        "tags": ["wedding", "summer"]
    })
}

pub fn protected_gallery(slug: &str, password: &str) -> Value {
    json!({
        "title": "Private session",
        "slug": slug,
        "isPasswordProtected": true,
        "password": password
    })
}

pub fn image(filename: &str) -> Value {
    json!({
        "filename": filename,
        "originalName": format!("IMG_{}", filename),
        "mimeType": "image/jpeg",
        "size": 4_194_304,
        "width": 6000,
        "height": 4000,
        "storagePath": format!("uploads/{}", filename)
    })
}
