use crate::models::{SchemaMarkup, StructuredData};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

static JSON_LD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#)
        .expect("JSON-LD selector should be valid")
});

struct TypeRules {
    types: &'static [&'static str],
    required: &'static [&'static str],
    recommended: &'static [&'static str],
}

const ARTICLE_TYPES: &[&str] = &["Article", "NewsArticle", "BlogPosting", "TechArticle"];

const VALIDATION_RULES: &[TypeRules] = &[
    TypeRules {
        types: &["Organization"],
        required: &["name"],
        recommended: &["url"],
    },
    TypeRules {
        types: &["WebSite"],
        required: &["name"],
        recommended: &["url"],
    },
    TypeRules {
        types: ARTICLE_TYPES,
        required: &["headline"],
        recommended: &["author", "datePublished"],
    },
    TypeRules {
        types: &["Product"],
        required: &["name"],
        recommended: &["offers"],
    },
    TypeRules {
        types: &["BreadcrumbList"],
        required: &["itemListElement"],
        recommended: &[],
    },
    TypeRules {
        types: &["FAQPage"],
        required: &["mainEntity"],
        recommended: &[],
    },
    TypeRules {
        types: &["HowTo"],
        required: &["name"],
        recommended: &["step"],
    },
    TypeRules {
        types: &["Review"],
        required: &["reviewRating"],
        recommended: &["author"],
    },
];

pub fn analyze(document: &Html, validate: bool) -> SchemaMarkup {
    let mut schema = SchemaMarkup::default();

    for (idx, script) in document.select(&JSON_LD_SELECTOR).enumerate() {
        let raw: String = script.text().collect();
        let value: Value = match serde_json::from_str(raw.trim()) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(block = idx + 1, error = %e, "Invalid JSON-LD block");
                schema
                    .parse_errors
                    .push(format!("JSON-LD block {}: {}", idx + 1, e));
                continue;
            }
        };

        let mut entities = Vec::new();
        collect_entities(&value, &mut entities);

        for entity in entities {
            let entity_types = type_names(entity);
            if entity_types.is_empty() {
                continue;
            }

            for kind in &entity_types {
                if !schema.types.contains(kind) {
                    schema.types.push(kind.clone());
                }
            }

            let (errors, warnings) = if validate {
                validate_entity(entity, &entity_types)
            } else {
                (vec![], vec![])
            };

            schema.structured_data.push(StructuredData {
                kind: entity_types.join(", "),
                properties: Value::Object(entity.clone()),
                errors,
                warnings,
            });
        }
    }

    let types = &schema.types;
    let has = |names: &[&str]| types.iter().any(|t| names.contains(&t.as_str()));
    let breadcrumbs = has(&["BreadcrumbList"]);
    let organization = has(&["Organization"]);
    let website = has(&["WebSite"]);
    let article = has(ARTICLE_TYPES);
    let product = has(&["Product"]);
    let review = has(&["Review"]);
    let faq = has(&["FAQPage"]);
    let how_to = has(&["HowTo"]);

    schema.breadcrumbs = breadcrumbs;
    schema.organization = organization;
    schema.website = website;
    schema.article = article;
    schema.product = product;
    schema.review = review;
    schema.faq = faq;
    schema.how_to = how_to;
    schema.found = !schema.structured_data.is_empty();

    schema
}

/// Top-level objects, members of top-level arrays and `@graph` members
fn collect_entities<'a>(value: &'a Value, out: &mut Vec<&'a Map<String, Value>>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_entities(item, out);
            }
        }
        Value::Object(map) => {
            out.push(map);
            if let Some(graph) = map.get("@graph") {
                collect_entities(graph, out);
            }
        }
        _ => {}
    }
}

fn type_names(entity: &Map<String, Value>) -> Vec<String> {
    match entity.get("@type") {
        Some(Value::String(kind)) => vec![kind.clone()],
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => vec![],
    }
}

fn is_present(entity: &Map<String, Value>, property: &str) -> bool {
    match entity.get(property) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

fn validate_entity(
    entity: &Map<String, Value>,
    entity_types: &[String],
) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for kind in entity_types {
        let Some(rules) = VALIDATION_RULES
            .iter()
            .find(|rules| rules.types.contains(&kind.as_str()))
        else {
            continue;
        };

        for property in rules.required {
            if !is_present(entity, property) {
                errors.push(format!(
                    "{} is missing required property '{}'",
                    kind, property
                ));
            }
        }
        for property in rules.recommended {
            if !is_present(entity, property) {
                warnings.push(format!(
                    "{} is missing recommended property '{}'",
                    kind, property
                ));
            }
        }
    }

    (errors, warnings)
}
