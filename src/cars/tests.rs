//! Tests for cars module
//!
//! - Create/update payload validation and price coercion
//! - Listing, search and ownership rules against an in-memory database

#[cfg(test)]
mod tests {
    use super::super::models::{CarCategory, CarStatus, CreateCarRequest, UpdateCarRequest};
    use super::super::services::CarsService;
    use super::super::validators::CarValidator;
    use crate::auth::extractors::test_support::{admin_ctx, user_ctx};
    use crate::common::migrations::test_support::setup_test_db;
    use crate::common::{ApiError, Validator};
    use serde_json::{json, Value};

    fn create_request(name: &str, price: Value) -> CreateCarRequest {
        CreateCarRequest {
            name: Some(name.to_string()),
            price: Some(price),
            category: Some("SUV".to_string()),
            location: Some("Dhaka".to_string()),
            image_url: Some("https://img.example.com/car.jpg".to_string()),
            description: Some("  Roomy and clean ".to_string()),
            provider_name: Some("Rahim".to_string()),
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    #[test]
    fn test_create_request_accepts_numeric_string_price() {
        let car = create_request("Pajero", json!("50")).into_new_car().unwrap();

        assert_eq!(car.price, 50.0);
        assert_eq!(car.category, CarCategory::Suv);
        assert_eq!(car.description.as_deref(), Some("Roomy and clean"));
    }

    #[test]
    fn test_create_request_reports_every_missing_field() {
        let result = CarValidator.validate(&CreateCarRequest::default());

        assert!(!result.is_valid);
        for field in ["name", "price", "category", "location", "imageUrl"] {
            assert!(result.has_error(field), "expected an error for {}", field);
        }
    }

    #[test]
    fn test_create_request_rejects_bad_price_and_category() {
        let mut request = create_request("Pajero", json!("fifty"));
        request.category = Some("Spaceship".to_string());
        let result = CarValidator.validate(&request);
        assert!(result.has_error("price"));
        assert!(result.has_error("category"));

        let zero = create_request("Pajero", json!(0)).into_new_car();
        assert!(matches!(zero, Err(ApiError::ValidationError(_))));

        let negative = create_request("Pajero", json!(-10.5)).into_new_car();
        assert!(matches!(negative, Err(ApiError::ValidationError(_))));
    }

    #[test]
    fn test_category_parsing_is_case_insensitive() {
        assert_eq!("suv".parse::<CarCategory>().unwrap(), CarCategory::Suv);
        assert_eq!(" Electric ".parse::<CarCategory>().unwrap(), CarCategory::Electric);
        assert!("van".parse::<CarCategory>().is_err());
        assert_eq!(serde_json::to_value(CarCategory::Suv).unwrap(), json!("SUV"));
    }

    #[test]
    fn test_update_request_ignores_immutable_fields() {
        let request: UpdateCarRequest = serde_json::from_value(json!({
            "id": "C_HIJACK",
            "providerEmail": "thief@example.com",
            "status": "available",
            "price": "75"
        }))
        .unwrap();

        let patch = request.into_patch().unwrap();
        assert_eq!(patch.price, Some(75.0));
        assert!(patch.name.is_none());
    }

    #[test]
    fn test_update_request_rejects_blanked_fields() {
        let request = UpdateCarRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        let result = CarValidator.validate(&request);
        assert!(result.has_error("name"));
    }

    // ========================================================================
    // Service
    // ========================================================================

    #[tokio::test]
    async fn test_create_stamps_provider_and_status() {
        let db = setup_test_db().await;
        let service = CarsService::new(db);
        let provider = user_ctx("provider@example.com");

        let car = service
            .create(&provider, create_request("Pajero", json!(50)).into_new_car().unwrap())
            .await
            .unwrap();

        assert!(car.id.starts_with("C_"));
        assert_eq!(car.provider_email, "provider@example.com");
        assert_eq!(car.status, CarStatus::Available);
        assert_eq!(car.price, 50.0);
        assert!(car.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_non_owner_update_is_forbidden_and_changes_nothing() {
        let db = setup_test_db().await;
        let service = CarsService::new(db);
        let owner = user_ctx("owner@example.com");
        let stranger = user_ctx("stranger@example.com");

        let car = service
            .create(&owner, create_request("Axio", json!(30)).into_new_car().unwrap())
            .await
            .unwrap();

        let patch = UpdateCarRequest {
            name: Some("Stolen".to_string()),
            price: Some(json!(1)),
            ..Default::default()
        }
        .into_patch()
        .unwrap();

        let result = service.update(&car.id, &stranger, patch.clone()).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));

        let unchanged = service.get(&car.id).await.unwrap();
        assert_eq!(unchanged.name, "Axio");
        assert_eq!(unchanged.price, 30.0);

        // Admins do not own other providers' cars either
        let result = service.update(&car.id, &admin_ctx("admin@example.com"), patch).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_owner_update_merges_fields() {
        let db = setup_test_db().await;
        let service = CarsService::new(db);
        let owner = user_ctx("owner@example.com");

        let car = service
            .create(&owner, create_request("Axio", json!(30)).into_new_car().unwrap())
            .await
            .unwrap();

        let patch = UpdateCarRequest {
            price: Some(json!("45.5")),
            category: Some("sedan".to_string()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();

        let updated = service.update(&car.id, &owner, patch).await.unwrap();
        assert_eq!(updated.name, "Axio");
        assert_eq!(updated.price, 45.5);
        assert_eq!(updated.category, CarCategory::Sedan);
        assert_eq!(updated.provider_email, "owner@example.com");
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_literal() {
        let db = setup_test_db().await;
        let service = CarsService::new(db);
        let owner = user_ctx("owner@example.com");

        for name in ["Toyota Corolla", "TOYOTA Prius", "Honda Civic", "100% Electric"] {
            service
                .create(&owner, create_request(name, json!(40)).into_new_car().unwrap())
                .await
                .unwrap();
        }

        assert_eq!(service.search("toyota").await.unwrap().len(), 2);
        assert_eq!(service.search("CIVIC").await.unwrap().len(), 1);
        assert_eq!(service.search("").await.unwrap().len(), 4);

        let literal = service.search("100%").await.unwrap();
        assert_eq!(literal.len(), 1);
        assert_eq!(literal[0].name, "100% Electric");
        assert!(service.search("_").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_names() {
        let db = setup_test_db().await;
        let service = CarsService::new(db);
        let owner = user_ctx("owner@example.com");

        let car = service
            .create(&owner, create_request("Škoda Octavia", json!(35)).into_new_car().unwrap())
            .await
            .unwrap();
        service
            .create(&owner, create_request("Ölmez Kamyonet", json!(35)).into_new_car().unwrap())
            .await
            .unwrap();

        for query in ["Škoda", "škoda", "ŠKODA", "ŠkOdA oct"] {
            let found = service.search(query).await.unwrap();
            assert_eq!(found.len(), 1, "query {:?}", query);
            assert_eq!(found[0].id, car.id);
        }
        assert_eq!(service.search("ölmez").await.unwrap().len(), 1);

        // Renaming refreshes the folded copy
        let patch = super::super::models::CarPatch {
            name: Some("ÉTOILE Coupé".to_string()),
            ..Default::default()
        };
        service.update(&car.id, &owner, patch).await.unwrap();
        assert!(service.search("škoda").await.unwrap().is_empty());
        assert_eq!(service.search("étoile coupé").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_listings_are_limited_and_scoped() {
        let db = setup_test_db().await;
        let service = CarsService::new(db);
        let alice = user_ctx("alice@example.com");
        let bob = user_ctx("bob@example.com");

        for i in 0..3 {
            service
                .create(&alice, create_request(&format!("Alice {}", i), json!(20)).into_new_car().unwrap())
                .await
                .unwrap();
        }
        service
            .create(&bob, create_request("Bob 0", json!(20)).into_new_car().unwrap())
            .await
            .unwrap();

        assert_eq!(service.list_recent(2).await.unwrap().len(), 2);
        assert_eq!(service.list_all().await.unwrap().len(), 4);
        assert_eq!(service.list_by_provider("ALICE@example.com").await.unwrap().len(), 3);
        assert_eq!(service.list_by_provider("bob@example.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let db = setup_test_db().await;
        let service = CarsService::new(db);
        let owner = user_ctx("owner@example.com");

        let car = service
            .create(&owner, create_request("Axio", json!(30)).into_new_car().unwrap())
            .await
            .unwrap();

        let missing = service.delete("C_MISSING1", &owner).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));

        let stranger = service.delete(&car.id, &user_ctx("x@example.com")).await;
        assert!(matches!(stranger, Err(ApiError::Forbidden(_))));

        service.delete(&car.id, &owner).await.unwrap();
        assert!(matches!(service.get(&car.id).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_admin_delete_requires_unrestricted_admin() {
        let db = setup_test_db().await;
        let service = CarsService::new(db);
        let owner = user_ctx("owner@example.com");

        let car = service
            .create(&owner, create_request("Axio", json!(30)).into_new_car().unwrap())
            .await
            .unwrap();

        let as_user = service.delete_as_admin(&car.id, &owner).await;
        assert!(matches!(as_user, Err(ApiError::Forbidden(_))));

        let mut demo = admin_ctx("admin@gmail.com");
        demo.restricted = true;
        let as_demo = service.delete_as_admin(&car.id, &demo).await;
        assert!(matches!(as_demo, Err(ApiError::Forbidden(_))));

        service
            .delete_as_admin(&car.id, &admin_ctx("root@example.com"))
            .await
            .unwrap();
        assert!(service.list_all().await.unwrap().is_empty());
    }
}
