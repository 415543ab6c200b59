#![allow(dead_code)]

use paygate::application::gateway::Gateway;
use paygate::config::{Configuration, Environment};
use paygate::domain::document::Document;
use paygate::infrastructure::in_memory::InMemoryTransport;
use rand::Rng;
use rand::distributions::Alphanumeric;

pub const MERCHANT_ID: &str = "integration_merchant_id";
pub const PUBLIC_KEY: &str = "integration_public_key";
pub const PRIVATE_KEY: &str = "integration_private_key";

pub fn config() -> Configuration {
    Configuration::new(Environment::Development, MERCHANT_ID, PUBLIC_KEY, PRIVATE_KEY)
}

pub fn gateway(transport: &InMemoryTransport) -> Gateway {
    Gateway::new(config(), Box::new(transport.clone())).unwrap()
}

/// Lowercase element name in underscore form, e.g. `ab_cde`.
pub fn random_name<R: Rng>(rng: &mut R) -> String {
    let mut name: String = (0..rng.gen_range(1..6))
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect();
    if rng.gen_bool(0.3) {
        name.push('_');
        name.extend((0..rng.gen_range(1..4)).map(|_| rng.gen_range(b'a'..=b'z') as char));
    }
    name
}

/// Text without leading or trailing whitespace, sometimes with characters
/// that need escaping.
pub fn random_text<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(0..12);
    let mut text: String = (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect();
    if text.len() >= 2 && rng.gen_bool(0.3) {
        let special = ["<", ">", "&", "\"", "'", " and "];
        text.insert_str(text.len() / 2, special[rng.gen_range(0..special.len())]);
    }
    text
}

/// A tree of strings, non-empty mappings and sequences.
///
/// Those are the shapes that survive an encode/decode round trip unchanged.
pub fn random_value<R: Rng>(rng: &mut R, depth: usize) -> Document {
    if depth == 0 {
        return Document::from(random_text(rng));
    }
    match rng.gen_range(0..4) {
        0 | 1 => Document::from(random_text(rng)),
        2 => {
            let entries = rng.gen_range(1..4);
            Document::from_pairs(
                (0..entries)
                    .map(|_| (random_name(rng), random_value(rng, depth - 1)))
                    .collect::<Vec<_>>(),
            )
        }
        _ => {
            let items = rng.gen_range(0..4);
            Document::Sequence((0..items).map(|_| random_value(rng, depth - 1)).collect())
        }
    }
}

/// A single-rooted document as the gateway would send it.
pub fn random_document<R: Rng>(rng: &mut R) -> Document {
    Document::from_pairs([(random_name(rng), random_value(rng, 4))])
}
