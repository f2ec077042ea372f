#[cfg(test)]
mod integration_tests {
    use crate::test_utils::test_utils::{
        setup_test_app, setup_test_app_with_state, TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    const REVIEW_TEXT: &str = "The rooms are spacious, the wifi is reliable and the walk to campus \
                               takes under ten minutes. Management responds quickly to issues.";

    async fn register(server: &TestServer, email: &str, name: &str) {
        let response = server
            .post("/api/auth/register")
            .json(&json!({
                "email": email,
                "password": "password123",
                "name": name,
                "year_of_study": "2nd Year",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    async fn login(server: &TestServer, email: &str, password: &str) -> String {
        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn register_and_login(server: &TestServer, email: &str, name: &str) -> String {
        register(server, email, name).await;
        login(server, email, "password123").await
    }

    async fn admin_token(server: &TestServer) -> String {
        login(server, TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD).await
    }

    fn property_payload(name: &str, university: &str) -> Value {
        json!({
            "name": name,
            "address": "12 Jorissen Street, Braamfontein",
            "type": "apartment",
            "price_min": 3500,
            "price_max": 6500,
            "university": university,
            "nsfas_accredited": true,
            "amenities": ["wifi", "laundry"],
        })
    }

    async fn create_property(server: &TestServer, token: &str, payload: Value) -> i64 {
        let response = server
            .post("/api/admin/properties")
            .authorization_bearer(token)
            .json(&payload)
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["property"]["id"].as_i64().unwrap()
    }

    fn review_payload(rating: i64) -> Value {
        json!({
            "overall_rating": rating,
            "review_text": REVIEW_TEXT,
            "recommend": true,
        })
    }

    async fn post_review(server: &TestServer, token: &str, property_id: i64, payload: Value) -> i64 {
        let response = server
            .post(&format!("/api/reviews/property/{}", property_id))
            .authorization_bearer(token)
            .json(&payload)
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["review"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_register_success() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/auth/register")
            .json(&json!({
                "email": "2345678@students.wits.ac.za",
                "password": "password123",
                "name": "Thandi M",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["message"], "Registration successful.");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_emails() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        for email in [
            "someone@gmail.com",
            "john@students.wits.ac.za",
            "12345@students.wits.ac.za",
            "12345678901@student.uj.ac.za",
            "not-an-email",
        ] {
            let response = server
                .post("/api/auth/register")
                .json(&json!({
                    "email": email,
                    "password": "password123",
                    "name": "Someone",
                }))
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        register(&server, "2345678@students.wits.ac.za", "First").await;

        let response = server
            .post("/api/auth/register")
            .json(&json!({
                "email": "2345678@students.wits.ac.za",
                "password": "password123",
                "name": "Second",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Email already registered");
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/auth/register")
            .json(&json!({
                "email": "2345678@students.wits.ac.za",
                "password": "short",
                "name": "Thandi M",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_and_profile() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        register(&server, "987654321@student.uj.ac.za", "Sipho D").await;

        let response = server
            .post("/api/auth/login")
            .json(&json!({
                "email": "987654321@student.uj.ac.za",
                "password": "password123",
            }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert!(body["access_token"].as_str().is_some());
        assert_eq!(body["user"]["university"], "uj");
        assert_eq!(body["user"]["verified"], true);

        let token = body["access_token"].as_str().unwrap();
        let profile = server
            .get("/api/auth/profile")
            .authorization_bearer(token)
            .await;
        profile.assert_status(StatusCode::OK);
        let profile_body: Value = profile.json();
        assert_eq!(profile_body["user"]["email"], "987654321@student.uj.ac.za");

        let anonymous = server.get("/api/auth/profile").await;
        anonymous.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        register(&server, "2345678@students.wits.ac.za", "Thandi M").await;

        let response = server
            .post("/api/auth/login")
            .json(&json!({
                "email": "2345678@students.wits.ac.za",
                "password": "wrong-password",
            }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_unapproved_property_hidden_until_approved() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;

        let mut payload = property_payload("Braam Lofts", "wits");
        payload["approved"] = json!(false);
        let property_id = create_property(&server, &admin, payload).await;

        // Invisible to the public while pending.
        let listing = server.get("/api/properties").await;
        listing.assert_status(StatusCode::OK);
        let body: Value = listing.json();
        assert_eq!(body["properties"].as_array().unwrap().len(), 0);
        assert_eq!(body["total"], 0);

        let single = server.get(&format!("/api/properties/{}", property_id)).await;
        single.assert_status(StatusCode::NOT_FOUND);

        // Still visible to moderation.
        let admin_listing = server
            .get("/api/admin/properties?status=pending")
            .authorization_bearer(&admin)
            .await;
        admin_listing.assert_status(StatusCode::OK);
        let admin_body: Value = admin_listing.json();
        assert_eq!(admin_body["total"], 1);

        let approve = server
            .post(&format!("/api/admin/properties/{}/approve", property_id))
            .authorization_bearer(&admin)
            .await;
        approve.assert_status(StatusCode::OK);

        let listing = server.get("/api/properties").await;
        let body: Value = listing.json();
        let properties = body["properties"].as_array().unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0]["name"], "Braam Lofts");
        assert_eq!(properties[0]["average_rating"], 0.0);
        assert_eq!(properties[0]["review_count"], 0);
    }

    #[tokio::test]
    async fn test_review_lifecycle() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        let student = register_and_login(&server, "2345678@students.wits.ac.za", "Thandi M").await;

        let property_id = create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;

        post_review(&server, &student, property_id, review_payload(4)).await;

        let single = server.get(&format!("/api/properties/{}", property_id)).await;
        single.assert_status(StatusCode::OK);
        let body: Value = single.json();
        assert_eq!(body["property"]["average_rating"], 4.0);
        assert_eq!(body["property"]["review_count"], 1);

        let reviews = server
            .get(&format!("/api/reviews/property/{}", property_id))
            .await;
        reviews.assert_status(StatusCode::OK);
        let reviews_body: Value = reviews.json();
        assert_eq!(reviews_body["total"], 1);
        assert_eq!(reviews_body["property"]["name"], "Braam Lofts");
        assert_eq!(reviews_body["reviews"][0]["author"], "Thandi M");

        // Second review from the same user is refused.
        let duplicate = server
            .post(&format!("/api/reviews/property/{}", property_id))
            .authorization_bearer(&student)
            .json(&review_payload(5))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);
        let duplicate_body: Value = duplicate.json();
        assert_eq!(duplicate_body["error"], "You have already reviewed this property");
    }

    #[tokio::test]
    async fn test_duplicate_review_conflicts_even_with_invalid_body() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        let student = register_and_login(&server, "2345678@students.wits.ac.za", "Thandi M").await;
        let property_id = create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;
        post_review(&server, &student, property_id, review_payload(4)).await;

        // A repeat submission answers 409 before any field checks run.
        let response = server
            .post(&format!("/api/reviews/property/{}", property_id))
            .authorization_bearer(&student)
            .json(&json!({"overall_rating": 9, "review_text": "short"}))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["error"], "You have already reviewed this property");
    }

    #[tokio::test]
    async fn test_review_validation() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        let student = register_and_login(&server, "2345678@students.wits.ac.za", "Thandi M").await;
        let property_id = create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;

        let post = |payload: Value| {
            let server = &server;
            let student = student.clone();
            async move {
                server
                    .post(&format!("/api/reviews/property/{}", property_id))
                    .authorization_bearer(&student)
                    .json(&payload)
                    .await
            }
        };

        // Unknown property comes first.
        let missing = server
            .post("/api/reviews/property/9999")
            .authorization_bearer(&student)
            .json(&review_payload(4))
            .await;
        missing.assert_status(StatusCode::NOT_FOUND);

        // Overall rating out of range.
        post(json!({"overall_rating": 0, "review_text": REVIEW_TEXT, "recommend": true}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        post(json!({"overall_rating": 6, "review_text": REVIEW_TEXT, "recommend": true}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        // Review text too short, even after trimming.
        post(json!({"overall_rating": 4, "review_text": "   too short   ", "recommend": true}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        // Recommendation must be present, but false is a valid answer.
        post(json!({"overall_rating": 4, "review_text": REVIEW_TEXT}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        // Sub-rating above the scale is refused.
        post(json!({
            "overall_rating": 4,
            "review_text": REVIEW_TEXT,
            "recommend": true,
            "value_rating": 6,
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

        // Zero sub-ratings mean "not rated" and are stored as absent.
        let created = post(json!({
            "overall_rating": 4,
            "review_text": REVIEW_TEXT,
            "recommend": false,
            "value_rating": 0,
            "safety_rating": 5,
        }))
        .await;
        created.assert_status(StatusCode::CREATED);
        let body: Value = created.json();
        assert!(body["review"]["value_rating"].is_null());
        assert_eq!(body["review"]["safety_rating"], 5);
        assert_eq!(body["review"]["recommend"], false);
    }

    #[tokio::test]
    async fn test_review_requires_authentication() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        let property_id = create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;

        let response = server
            .post(&format!("/api/reviews/property/{}", property_id))
            .json(&review_payload(4))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_anonymous_review_hides_author() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        let student = register_and_login(&server, "2345678@students.wits.ac.za", "Thandi M").await;
        let property_id = create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;

        let mut payload = review_payload(5);
        payload["anonymous"] = json!(true);
        post_review(&server, &student, property_id, payload).await;

        let reviews = server
            .get(&format!("/api/reviews/property/{}", property_id))
            .await;
        let body: Value = reviews.json();
        let review = &body["reviews"][0];
        assert_eq!(review["author"], "Anonymous");
        assert!(review["author_year"].is_null());
        // Campus context survives anonymisation.
        assert_eq!(review["author_university"], "wits");

        // Moderation still sees the reviewer.
        let admin_reviews = server
            .get("/api/admin/reviews")
            .authorization_bearer(&admin)
            .await;
        admin_reviews.assert_status(StatusCode::OK);
        let admin_body: Value = admin_reviews.json();
        assert_eq!(admin_body["reviews"][0]["user_name"], "Thandi M");
        assert_eq!(admin_body["reviews"][0]["user_email"], "2345678@students.wits.ac.za");
    }

    #[tokio::test]
    async fn test_university_membership_filter() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;

        create_property(&server, &admin, property_payload("Wits Only", "wits")).await;
        create_property(&server, &admin, property_payload("Shared Res", "wits & uj")).await;
        create_property(&server, &admin, property_payload("UJ Digs", "uj")).await;

        let names = |body: &Value| -> Vec<String> {
            body["properties"]
                .as_array()
                .unwrap()
                .iter()
                .map(|p| p["name"].as_str().unwrap().to_string())
                .collect()
        };

        let wits: Value = server.get("/api/properties?university=wits").await.json();
        let mut wits_names = names(&wits);
        wits_names.sort();
        assert_eq!(wits_names, vec!["Shared Res", "Wits Only"]);

        let uj: Value = server.get("/api/properties?university=uj").await.json();
        let mut uj_names = names(&uj);
        uj_names.sort();
        assert_eq!(uj_names, vec!["Shared Res", "UJ Digs"]);

        let all: Value = server.get("/api/properties?university=all").await.json();
        assert_eq!(all["total"], 3);
    }

    #[tokio::test]
    async fn test_type_price_and_search_filters() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;

        create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;
        let mut house = property_payload("Melville House", "uj");
        house["type"] = json!("house");
        house["price_min"] = json!(2000);
        house["price_max"] = json!(4000);
        create_property(&server, &admin, house).await;

        let by_type: Value = server.get("/api/properties?type=house").await.json();
        assert_eq!(by_type["total"], 1);
        assert_eq!(by_type["properties"][0]["name"], "Melville House");

        // min_price keeps properties whose own minimum is at least the bound.
        let by_min: Value = server.get("/api/properties?min_price=3000").await.json();
        assert_eq!(by_min["total"], 1);
        assert_eq!(by_min["properties"][0]["name"], "Braam Lofts");

        // max_price keeps properties whose own maximum is within the bound.
        let by_max: Value = server.get("/api/properties?max_price=5000").await.json();
        assert_eq!(by_max["total"], 1);
        assert_eq!(by_max["properties"][0]["name"], "Melville House");

        let by_search: Value = server.get("/api/properties?search=BRAAM").await.json();
        assert_eq!(by_search["total"], 1);
        assert_eq!(by_search["properties"][0]["name"], "Braam Lofts");

        let by_address: Value = server.get("/api/properties?search=jorissen").await.json();
        assert_eq!(by_address["total"], 2);
    }

    #[tokio::test]
    async fn test_pagination_out_of_range() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;

        let body: Value = server.get("/api/properties?page=5&per_page=10").await.json();
        assert_eq!(body["properties"].as_array().unwrap().len(), 0);
        assert_eq!(body["total"], 1);
        assert_eq!(body["pages"], 1);
        assert_eq!(body["current_page"], 5);
    }

    #[tokio::test]
    async fn test_admin_gate() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let anonymous = server.get("/api/admin/dashboard").await;
        anonymous.assert_status(StatusCode::UNAUTHORIZED);

        let student = register_and_login(&server, "2345678@students.wits.ac.za", "Thandi M").await;
        let forbidden = server
            .get("/api/admin/dashboard")
            .authorization_bearer(&student)
            .await;
        forbidden.assert_status(StatusCode::FORBIDDEN);
        let body: Value = forbidden.json();
        assert_eq!(body["error"], "Admin access required");

        let admin = admin_token(&server).await;
        let allowed = server
            .get("/api/admin/dashboard")
            .authorization_bearer(&admin)
            .await;
        allowed.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_dashboard_counts() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;

        create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;
        let mut pending = property_payload("Pending Res", "uj");
        pending["approved"] = json!(false);
        create_property(&server, &admin, pending).await;

        let body: Value = server
            .get("/api/admin/dashboard")
            .authorization_bearer(&admin)
            .await
            .json();
        assert_eq!(body["total_properties"], 2);
        assert_eq!(body["approved_properties"], 1);
        assert_eq!(body["pending_properties"], 1);
        // Admin accounts are not counted as platform users.
        assert_eq!(body["total_users"], 0);
        assert_eq!(body["total_reviews"], 0);
        assert_eq!(body["recent_properties"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_admin_update_and_delete_property() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        let student = register_and_login(&server, "2345678@students.wits.ac.za", "Thandi M").await;
        let property_id = create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;
        post_review(&server, &student, property_id, review_payload(4)).await;

        // Unapproving is an explicit admin action.
        let update = server
            .put(&format!("/api/admin/properties/{}", property_id))
            .authorization_bearer(&admin)
            .json(&json!({"approved": false, "name": "Braam Lofts Renamed"}))
            .await;
        update.assert_status(StatusCode::OK);
        let update_body: Value = update.json();
        assert_eq!(update_body["property"]["name"], "Braam Lofts Renamed");
        assert_eq!(update_body["property"]["approved"], false);

        let hidden = server.get(&format!("/api/properties/{}", property_id)).await;
        hidden.assert_status(StatusCode::NOT_FOUND);

        // University change retargets the campus filter.
        let retarget = server
            .put(&format!("/api/admin/properties/{}", property_id))
            .authorization_bearer(&admin)
            .json(&json!({"approved": true, "university": "uj"}))
            .await;
        retarget.assert_status(StatusCode::OK);
        let uj: Value = server.get("/api/properties?university=uj").await.json();
        assert_eq!(uj["total"], 1);
        let wits: Value = server.get("/api/properties?university=wits").await.json();
        assert_eq!(wits["total"], 0);

        // Deleting removes the reviews as well.
        let delete = server
            .delete(&format!("/api/admin/properties/{}", property_id))
            .authorization_bearer(&admin)
            .await;
        delete.assert_status(StatusCode::OK);

        let gone = server.get(&format!("/api/properties/{}", property_id)).await;
        gone.assert_status(StatusCode::NOT_FOUND);
        let reviews: Value = server
            .get("/api/admin/reviews")
            .authorization_bearer(&admin)
            .await
            .json();
        assert_eq!(reviews["total"], 0);

        let missing = server
            .delete(&format!("/api/admin/properties/{}", property_id))
            .authorization_bearer(&admin)
            .await;
        missing.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_update_rejects_blank_university() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        let property_id = create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;

        // A blank affiliation would strip the property from every campus
        // filter, so it is refused.
        for university in ["", "   "] {
            let response = server
                .put(&format!("/api/admin/properties/{}", property_id))
                .authorization_bearer(&admin)
                .json(&json!({ "university": university }))
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["error"], "University is required");
        }

        // The campus membership is untouched by the rejected updates.
        let wits: Value = server.get("/api/properties?university=wits").await.json();
        assert_eq!(wits["total"], 1);
    }

    #[tokio::test]
    async fn test_admin_users_and_verification() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        register(&server, "2345678@students.wits.ac.za", "Thandi M").await;

        let body: Value = server
            .get("/api/admin/users")
            .authorization_bearer(&admin)
            .await
            .json();
        // Admin accounts are not listed.
        assert_eq!(body["total"], 1);
        let user_id = body["users"][0]["id"].as_i64().unwrap();

        let verify = server
            .post(&format!("/api/admin/users/{}/verify", user_id))
            .authorization_bearer(&admin)
            .await;
        verify.assert_status(StatusCode::OK);

        let missing = server
            .post("/api/admin/users/9999/verify")
            .authorization_bearer(&admin)
            .await;
        missing.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mark_review_helpful() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        let author = register_and_login(&server, "2345678@students.wits.ac.za", "Thandi M").await;
        let voter = register_and_login(&server, "987654321@student.uj.ac.za", "Sipho D").await;
        let property_id = create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;
        let review_id = post_review(&server, &author, property_id, review_payload(4)).await;

        let first = server
            .post(&format!("/api/reviews/{}/helpful", review_id))
            .authorization_bearer(&voter)
            .await;
        first.assert_status(StatusCode::OK);
        let first_body: Value = first.json();
        assert_eq!(first_body["helpful_count"], 1);

        let second = server
            .post(&format!("/api/reviews/{}/helpful", review_id))
            .authorization_bearer(&voter)
            .await;
        let second_body: Value = second.json();
        assert_eq!(second_body["helpful_count"], 2);

        let unauthenticated = server
            .post(&format!("/api/reviews/{}/helpful", review_id))
            .await;
        unauthenticated.assert_status(StatusCode::UNAUTHORIZED);

        let missing = server
            .post("/api/reviews/9999/helpful")
            .authorization_bearer(&voter)
            .await;
        missing.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_review_listing_filters() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        let wits_student = register_and_login(&server, "2345678@students.wits.ac.za", "Thandi M").await;
        let uj_student = register_and_login(&server, "987654321@student.uj.ac.za", "Sipho D").await;

        let lofts = create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;
        let digs = create_property(&server, &admin, property_payload("UJ Digs", "uj")).await;
        post_review(&server, &wits_student, lofts, review_payload(5)).await;
        post_review(&server, &uj_student, digs, review_payload(2)).await;

        let all: Value = server.get("/api/reviews").await.json();
        assert_eq!(all["total"], 2);

        let by_campus: Value = server.get("/api/reviews?university=wits").await.json();
        assert_eq!(by_campus["total"], 1);
        assert_eq!(by_campus["reviews"][0]["author"], "Thandi M");

        let by_rating: Value = server.get("/api/reviews?min_rating=4").await.json();
        assert_eq!(by_rating["total"], 1);
        assert_eq!(by_rating["reviews"][0]["overall_rating"], 5);

        let by_search: Value = server.get("/api/reviews?search=digs").await.json();
        assert_eq!(by_search["total"], 1);
        assert_eq!(by_search["reviews"][0]["property_name"], "UJ Digs");
    }

    #[tokio::test]
    async fn test_user_review_stats() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let admin = admin_token(&server).await;
        let student = register_and_login(&server, "2345678@students.wits.ac.za", "Thandi M").await;

        let lofts = create_property(&server, &admin, property_payload("Braam Lofts", "wits")).await;
        let digs = create_property(&server, &admin, property_payload("UJ Digs", "uj")).await;
        post_review(&server, &student, lofts, review_payload(5)).await;
        post_review(&server, &student, digs, review_payload(4)).await;

        let body: Value = server
            .get("/api/reviews/user/stats")
            .authorization_bearer(&student)
            .await
            .json();
        assert_eq!(body["stats"]["reviewsCount"], 2);
        assert_eq!(body["stats"]["avgRating"], 4.5);
        assert_eq!(body["stats"]["helpfulVotes"], 0);
        assert_eq!(body["recent_reviews"].as_array().unwrap().len(), 2);
        assert!(body["recent_reviews"][0]["property_name"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        let token = register_and_login(&server, "2345678@students.wits.ac.za", "Thandi M").await;
        let profile: Value = server
            .get("/api/auth/profile")
            .authorization_bearer(&token)
            .await
            .json();
        let user_id = profile["user"]["id"].as_i64().unwrap() as i32;

        // Requesting a reset never reveals whether the account exists.
        for email in ["2345678@students.wits.ac.za", "9999999@students.wits.ac.za"] {
            let response = server
                .post("/api/auth/reset-password/request")
                .json(&json!({ "email": email }))
                .await;
            response.assert_status(StatusCode::OK);
        }

        // Access tokens are not accepted as reset tokens.
        let wrong_purpose = server
            .post("/api/auth/reset-password/confirm")
            .json(&json!({ "token": token, "password": "newpassword9" }))
            .await;
        wrong_purpose.assert_status(StatusCode::UNAUTHORIZED);

        let reset_token = state.auth.issue_reset_token(user_id).unwrap();

        let too_short = server
            .post("/api/auth/reset-password/confirm")
            .json(&json!({ "token": reset_token, "password": "short" }))
            .await;
        too_short.assert_status(StatusCode::BAD_REQUEST);

        let confirm = server
            .post("/api/auth/reset-password/confirm")
            .json(&json!({ "token": reset_token, "password": "newpassword9" }))
            .await;
        confirm.assert_status(StatusCode::OK);

        let old_password = server
            .post("/api/auth/login")
            .json(&json!({
                "email": "2345678@students.wits.ac.za",
                "password": "password123",
            }))
            .await;
        old_password.assert_status(StatusCode::UNAUTHORIZED);

        login(&server, "2345678@students.wits.ac.za", "newpassword9").await;
    }
}
