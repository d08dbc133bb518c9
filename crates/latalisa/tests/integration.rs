//! The crates working together through the umbrella.

use latalisa::builders::{Builder, ComparatorBuilder, Dir, MapBuilder};
use latalisa::core::{codec, crypto, validation::CpfCnpj, Validator};
use latalisa::persistence::{
    select_all, Entity, Facade, MemoryFactory, QueryStrategy, Transactional,
};
use latalisa::web::{BearerFilter, HttpRequest, Rejection, Request, AUTHORIZATION};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Company {
    id: Option<i64>,
    document: String,
    name: String,
}

impl Entity for Company {
    const NAME: &'static str = "Company";
}

#[test]
fn validated_companies_are_stored_and_sorted() {
    let factory = MemoryFactory::new()
        .table("Company", "id")
        .handler(QueryStrategy::Default, "all", select_all("Company"));
    let mut facade = Transactional::new(factory.open_context());

    let candidates = [
        ("11.444.777/0001-61", "Beta"),
        ("11.444.777/0001-62", "Broken"),
        ("111.444.777-35", "Alpha"),
    ];
    for (document, name) in candidates {
        if CpfCnpj.is_valid(document) {
            facade
                .create(&Company {
                    id: None,
                    document: document.into(),
                    name: name.into(),
                })
                .unwrap();
        }
    }

    let mut companies: Vec<Company> = facade.query(QueryStrategy::Default, "all").list().unwrap();
    ComparatorBuilder::new()
        .add_dir(|c: &Company| c.name.clone(), Dir::Desc)
        .build()
        .sort(&mut companies);

    let names: Vec<_> = companies.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Beta", "Alpha"]);
}

#[test]
fn tokens_signed_with_core_digests() {
    let secret = "s3cr3t";
    let expected = codec::encode_hex(&crypto::digest(crypto::DigestAlgorithm::Sha256, secret));
    let filter = BearerFilter::new(move |_: &dyn HttpRequest, token: &str| {
        if token == expected {
            Ok(())
        } else {
            Err(Rejection::forbidden())
        }
    });

    let token = codec::encode_hex(&crypto::digest(crypto::DigestAlgorithm::Sha256, secret));
    let headers = MapBuilder::new()
        .put(AUTHORIZATION, format!("Bearer {token}"))
        .build();

    let mut request = Request::new();
    for (name, value) in &headers {
        request = request.header(name, value.clone());
    }
    assert!(filter.filter(&request).is_ok());
}
