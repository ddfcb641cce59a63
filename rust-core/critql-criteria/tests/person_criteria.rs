// SPDX-License-Identifier: PMPL-1.0-or-later
//! End-to-end compilation of a typed criteria struct

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, TimeZone, Utc};
use critql_criteria::{
    Criteria, CriteriaCompiler, CriteriaControls, CriteriaSchema, CriteriaValue, DynamicCriteria,
    EntityMetadata, EntityRegistry, IndexKind, RangeOptions, ValueOptions, WordOptions,
};
use critql_query::{
    CombinedQuery, DocumentFormat, Element, QueryValue, RangeOperator, StructuredQuery,
};

static PERSON_SCHEMA: LazyLock<CriteriaSchema> = LazyLock::new(|| {
    CriteriaSchema::builder("Person")
        .word("name", WordOptions::default())
        .value("hasExactNameOf", ValueOptions::default().with_field("name"))
        .plain("age")
        .range("olderThan", RangeOptions::new(RangeOperator::Gt).with_field("age"))
        .range("youngerThan", RangeOptions::new(RangeOperator::Lt).with_field("age"))
        .plain("gender")
        .word("occupation", WordOptions::default())
        .word("description", WordOptions::default())
        .plain("birthtime")
        .range(
            "bornAfter",
            RangeOptions::new(RangeOperator::Gt)
                .with_field("birthtime")
                .with_index_kind(IndexKind::Element),
        )
        .range("modifiedBefore", RangeOptions::new(RangeOperator::Lt).with_field("modified"))
        .plain("hobbies")
        .word("pets", WordOptions::default().with_field("pets.name"))
        .build()
        .expect("person schema is valid")
});

#[derive(Debug, Default, Clone)]
struct PersonCriteria {
    name: Option<String>,
    has_exact_name_of: Option<String>,
    age: Option<i32>,
    older_than: Option<i32>,
    younger_than: Option<i32>,
    gender: Option<String>,
    occupation: Option<String>,
    description: Option<String>,
    birthtime: Option<DateTime<Utc>>,
    born_after: Option<DateTime<Utc>>,
    modified_before: Option<DateTime<Utc>>,
    hobbies: Option<String>,
    pets: Option<String>,
    controls: CriteriaControls,
}

impl Criteria for PersonCriteria {
    fn schema(&self) -> &CriteriaSchema {
        &PERSON_SCHEMA
    }

    fn value(&self, field: &str) -> Option<CriteriaValue> {
        match field {
            "name" => self.name.clone().map(Into::into),
            "hasExactNameOf" => self.has_exact_name_of.clone().map(Into::into),
            "age" => self.age.map(Into::into),
            "olderThan" => self.older_than.map(Into::into),
            "youngerThan" => self.younger_than.map(Into::into),
            "gender" => self.gender.clone().map(Into::into),
            "occupation" => self.occupation.clone().map(Into::into),
            "description" => self.description.clone().map(Into::into),
            "birthtime" => self.birthtime.map(Into::into),
            "bornAfter" => self.born_after.map(Into::into),
            "modifiedBefore" => self.modified_before.map(Into::into),
            "hobbies" => self.hobbies.clone().map(Into::into),
            "pets" => self.pets.clone().map(Into::into),
            _ => None,
        }
    }

    fn controls(&self) -> &CriteriaControls {
        &self.controls
    }
}

/// Criteria whose `configure` replaces everything with an OR of two genders.
struct EitherGenderCriteria(PersonCriteria);

impl Criteria for EitherGenderCriteria {
    fn schema(&self) -> &CriteriaSchema {
        self.0.schema()
    }

    fn value(&self, field: &str) -> Option<CriteriaValue> {
        self.0.value(field)
    }

    fn controls(&self) -> &CriteriaControls {
        self.0.controls()
    }

    fn configure(&self, query: CombinedQuery) -> CombinedQuery {
        let gender = |g: &str| {
            StructuredQuery::value(
                Element::json_property("gender"),
                vec![g.into()],
                vec!["exact".to_string()],
                1.0,
            )
        };
        query.with_structured(StructuredQuery::or([gender("male"), gender("female")]))
    }
}

fn compiler(format: DocumentFormat) -> CriteriaCompiler {
    let registry = EntityRegistry::new().with_entity("Person", EntityMetadata::new(format));
    CriteriaCompiler::new(Arc::new(registry))
}

fn instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn test_engineer_older_than_born_after() {
    let criteria = PersonCriteria {
        occupation: Some("Engineer".to_string()),
        older_than: Some(30),
        born_after: Some(instant()),
        ..Default::default()
    };

    let query = compiler(DocumentFormat::Json).compile(&criteria);

    // Predicates follow schema declaration order: olderThan precedes occupation
    let expected = StructuredQuery::and([
        StructuredQuery::range(
            Element::path_index("/age"),
            "xs:int",
            RangeOperator::Gt,
            vec![QueryValue::Integer(30)],
            vec![],
        ),
        StructuredQuery::and([StructuredQuery::word(
            Element::json_property("occupation"),
            vec!["*engineer*".to_string()],
            vec![],
            1.0,
        )]),
        StructuredQuery::range(
            Element::json_property("birthtime"),
            "xs:dateTime",
            RangeOperator::Gt,
            vec![QueryValue::DateTime(instant())],
            vec![],
        ),
    ]);
    assert_eq!(query.structured, expected);
}

#[test]
fn test_null_fields_compile_to_match_all() {
    let query = compiler(DocumentFormat::Json).compile(&PersonCriteria::default());
    assert!(query.structured.is_match_all());
    assert_eq!(query, CombinedQuery::default());
}

#[test]
fn test_xml_and_json_addressing_differ() {
    let criteria = PersonCriteria {
        name: Some("Bobby".to_string()),
        gender: Some("male".to_string()),
        ..Default::default()
    };

    let json = compiler(DocumentFormat::Json).compile(&criteria);
    let xml = compiler(DocumentFormat::Xml).compile(&criteria);
    assert_ne!(json, xml);

    let mut xml_elements = Vec::new();
    xml.structured.walk(&mut |node| match node {
        StructuredQuery::Word { element, .. } | StructuredQuery::Value { element, .. } => {
            xml_elements.push(element.clone())
        }
        _ => {}
    });
    assert_eq!(
        xml_elements,
        vec![Element::xml_element("name"), Element::xml_element("gender")]
    );
}

#[test]
fn test_pets_scoped_under_container() {
    let criteria = PersonCriteria {
        pets: Some("Fluffy".to_string()),
        ..Default::default()
    };
    let query = compiler(DocumentFormat::Json).compile(&criteria);

    let expected = StructuredQuery::and([StructuredQuery::container(
        Element::json_property("pets"),
        StructuredQuery::and([StructuredQuery::word(
            Element::json_property("name"),
            vec!["*fluffy*".to_string()],
            vec![],
            1.0,
        )]),
    )]);
    assert_eq!(query.structured, expected);
}

#[test]
fn test_exact_name_value_override() {
    let criteria = PersonCriteria {
        has_exact_name_of: Some("Bobby".to_string()),
        age: Some(23),
        ..Default::default()
    };
    let query = compiler(DocumentFormat::Json).compile(&criteria);
    assert_eq!(
        query.structured,
        StructuredQuery::and([
            StructuredQuery::value(
                Element::json_property("name"),
                vec!["Bobby".into()],
                vec!["exact".to_string()],
                1.0,
            ),
            StructuredQuery::value(
                Element::json_property("age"),
                vec![QueryValue::Integer(23)],
                vec!["exact".to_string()],
                1.0,
            ),
        ])
    );
}

#[test]
fn test_projections_and_free_text() {
    let criteria = PersonCriteria {
        gender: Some("female".to_string()),
        controls: CriteriaControls::default()
            .with_free_text("occupation:knitter")
            .with_projections(["name", "friends.name"]),
        ..Default::default()
    };
    let query = compiler(DocumentFormat::Json).compile(&criteria);
    assert_eq!(query.qtext.as_deref(), Some("occupation:knitter"));
    assert_eq!(query.extracts, vec!["/name", "/friends/name"]);
    assert_eq!(query.structured.leaf_count(), 1);
}

#[test]
fn test_configure_has_last_word() {
    let criteria = EitherGenderCriteria(PersonCriteria {
        occupation: Some("Engineer".to_string()),
        ..Default::default()
    });
    let query = compiler(DocumentFormat::Json).compile(&criteria);
    match &query.structured {
        StructuredQuery::Or { queries } => assert_eq!(queries.len(), 2),
        other => panic!("expected or-query, got {:?}", other),
    }
}

#[test]
fn test_concurrent_compiles_share_compiler() {
    let contact_schema = Arc::new(
        CriteriaSchema::builder("Contact")
            .word("name", WordOptions::default())
            .build()
            .unwrap(),
    );
    let registry = EntityRegistry::new()
        .with_entity("Person", EntityMetadata::new(DocumentFormat::Xml))
        .with_entity("Contact", EntityMetadata::new(DocumentFormat::Json));
    let compiler = Arc::new(CriteriaCompiler::new(Arc::new(registry)));

    let person = PersonCriteria {
        name: Some("Bob".to_string()),
        ..Default::default()
    };
    let contact = DynamicCriteria::new(contact_schema)
        .with_value("name", "Bob")
        .unwrap();

    let person_baseline = compiler.compile(&person);
    let contact_baseline = compiler.compile(&contact);
    assert_ne!(person_baseline, contact_baseline);

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let compiler = Arc::clone(&compiler);
            let person = person.clone();
            let contact = contact.clone();
            std::thread::spawn(move || {
                let mut results = Vec::new();
                for round in 0..50 {
                    // Alternate entities so XML and JSON compiles interleave across threads
                    if (i + round) % 2 == 0 {
                        results.push((true, compiler.compile(&person)));
                    } else {
                        results.push((false, compiler.compile(&contact)));
                    }
                }
                results
            })
        })
        .collect();

    for handle in handles {
        for (is_person, query) in handle.join().unwrap() {
            if is_person {
                assert_eq!(query, person_baseline);
            } else {
                assert_eq!(query, contact_baseline);
            }
        }
    }
}
