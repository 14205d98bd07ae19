//! HTML fixtures shaped like each store's search result page.

#![allow(dead_code)]

use vfood::models::Store;

pub const GAMA_CART_BUTTON: &str = r#"<button class="btn btn-primary btn-block glyphicon glyphicon-shopping-cart js-enable-btn ec-add-cart-btn">Agregar</button>"#;

/// One listing with a name and a price element.
pub fn listing(store: Store, name: &str, price: &str) -> String {
    match store {
        Store::Gama => format!(
            r#"<li class="product__list--item"><a class="product__list--name" href="/p/{name}">{name}</a><div class="from-price-value">Total Ref. {price}</div>{GAMA_CART_BUTTON}</li>"#
        ),
        Store::CentralMadeirense => format!(
            r#"<div class="product-inner"><div class="description"><h3>{name}</h3></div><span class="price">Ref. {price}</span></div>"#
        ),
        Store::Plazas => format!(
            r#"<div class="Product"><div class="Description">{name}</div><div class="Price">Precio IVA {price} (E)</div></div>"#
        ),
        Store::PlanSuarez => format!(
            r#"<div class="product-thumb"><div class="name"><a href="/p">{name}</a></div><span class="price-normal">Bs.{price}</span></div>"#
        ),
    }
}

/// A listing whose price element is missing.
pub fn listing_without_price(store: Store, name: &str) -> String {
    match store {
        Store::Gama => format!(
            r#"<li class="product__list--item"><a class="product__list--name">{name}</a></li>"#
        ),
        Store::CentralMadeirense => format!(
            r#"<div class="product-inner"><div class="description">{name}</div></div>"#
        ),
        Store::Plazas => format!(
            r#"<div class="Product"><div class="Description">{name}</div></div>"#
        ),
        Store::PlanSuarez => format!(
            r#"<div class="product-thumb"><div class="name">{name}</div></div>"#
        ),
    }
}

/// Price written the way the store writes it, for a value in the 1..100 range.
pub fn store_price(store: Store, units: u32) -> String {
    match store {
        Store::Gama | Store::CentralMadeirense => format!("{},50", units),
        Store::Plazas | Store::PlanSuarez => format!("1,{:03}.00", units),
    }
}

/// Wrap listings in a page.
pub fn page(listings: &[String]) -> String {
    format!(
        "<html><body><div class=\"results\">{}</div></body></html>",
        listings.join("\n")
    )
}
