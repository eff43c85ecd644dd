use serde_json::json;

use crate::common::{TestApp, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn text_event_is_created_and_readable_by_anyone() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let id = app.create_event(&token, "Flood").await;
        let res = app.get_without_token(&routes::event(id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Flood");
        assert_eq!(res.body["event_type"], "TEXT");
        assert_eq!(res.body["likes"], 0);
        assert_eq!(res.body["county"]["name"], "Santa Clara");
        assert_eq!(res.body["author_username"], "alice");
        assert_eq!(res.body["picture_links"], json!([]));
        assert!(res.body["video_link"].is_null());
    }

    #[tokio::test]
    async fn picture_links_make_an_image_event_in_order() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(
                routes::EVENTS,
                &json!({
                    "title": "Parade",
                    "county_id": 6001,
                    "picture_links": ["b.png", "a.png", "c.png"],
                    "video_link": "ignored.mp4",
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let event = app.get_without_token(&routes::event(res.id())).await;
        assert_eq!(event.body["event_type"], "IMAGE");
        assert_eq!(event.body["picture_links"], json!(["b.png", "a.png", "c.png"]));
        assert!(event.body["video_link"].is_null());
    }

    #[tokio::test]
    async fn video_link_alone_makes_a_video_event() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(
                routes::EVENTS,
                &json!({"title": "Storm", "county_id": 6085, "video_link": "storm.mp4"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let event = app.get_without_token(&routes::event(res.id())).await;
        assert_eq!(event.body["event_type"], "VIDEO");
        assert_eq!(event.body["video_link"], "storm.mp4");
    }

    #[tokio::test]
    async fn anonymous_caller_cannot_post() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::EVENTS, &json!({"title": "Flood", "county_id": 6085}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn county_is_required_and_must_exist() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let missing = app
            .post_with_token(routes::EVENTS, &json!({"title": "Flood"}), &token)
            .await;
        assert_eq!(missing.status, 400);
        assert_eq!(missing.body["code"], "VALIDATION_ERROR");

        let unknown = app
            .post_with_token(
                routes::EVENTS,
                &json!({"title": "Flood", "county_id": 99999}),
                &token,
            )
            .await;
        assert_eq!(unknown.status, 400);
        assert_eq!(unknown.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(
                routes::EVENTS,
                &json!({"title": "   ", "county_id": 6085}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_event_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::event(424242)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod modification {
    use super::*;

    #[tokio::test]
    async fn author_can_replace_content_and_attachments() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let id = app.create_event(&token, "Flood").await;

        let res = app
            .put_with_token(
                &routes::event(id),
                &json!({
                    "title": "Flood update",
                    "content": "Water receding.",
                    "picture_links": ["after.jpg"],
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.id(), id);

        let event = app.get_without_token(&routes::event(id)).await;
        assert_eq!(event.body["title"], "Flood update");
        assert_eq!(event.body["content"], "Water receding.");
        assert_eq!(event.body["event_type"], "IMAGE");
        assert_eq!(event.body["picture_links"], json!(["after.jpg"]));
        assert_eq!(event.body["county"]["id"], 6085);
    }

    #[tokio::test]
    async fn other_users_cannot_edit_or_delete() {
        let app = TestApp::spawn().await;
        let alice = app.create_authenticated_user("alice", "securepass").await;
        let bob = app.create_authenticated_user("bob", "securepass").await;
        let id = app.create_event(&alice, "Flood").await;

        let edit = app
            .put_with_token(&routes::event(id), &json!({"title": "Mine now"}), &bob)
            .await;
        assert_eq!(edit.status, 403);
        assert_eq!(edit.body["code"], "PERMISSION_DENIED");

        let delete = app.delete_with_token(&routes::event(id), &bob).await;
        assert_eq!(delete.status, 403);

        let event = app.get_without_token(&routes::event(id)).await;
        assert_eq!(event.body["title"], "Flood");
    }

    #[tokio::test]
    async fn can_modify_reflects_ownership() {
        let app = TestApp::spawn().await;
        let alice = app.create_authenticated_user("alice", "securepass").await;
        let bob = app.create_authenticated_user("bob", "securepass").await;
        let id = app.create_event(&alice, "Flood").await;

        let owner = app.get_with_token(&routes::event_can_modify(id), &alice).await;
        assert_eq!(owner.body["can_modify"], true);

        let other = app.get_with_token(&routes::event_can_modify(id), &bob).await;
        assert_eq!(other.body["can_modify"], false);

        let anonymous = app.get_without_token(&routes::event_can_modify(id)).await;
        assert_eq!(anonymous.status, 200);
        assert_eq!(anonymous.body["can_modify"], false);

        let missing = app
            .get_with_token(&routes::event_can_modify(424242), &alice)
            .await;
        assert_eq!(missing.body["can_modify"], false);
    }

    #[tokio::test]
    async fn deleting_removes_the_event_and_its_uploaded_files() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let filename = app.upload_image(&token).await;

        let created = app
            .post_with_token(
                routes::EVENTS,
                &json!({"title": "Parade", "county_id": 6085, "picture_links": [filename]}),
                &token,
            )
            .await;
        assert_eq!(created.status, 201, "{}", created.text);
        let id = created.id();

        let res = app.delete_with_token(&routes::event(id), &token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["deleted"], true);

        let gone = app.get_without_token(&routes::event(id)).await;
        assert_eq!(gone.status, 404);

        let file = app.get_raw(&routes::upload(&filename)).await;
        assert_eq!(file.status().as_u16(), 404);
    }
}

mod likes {
    use super::*;

    #[tokio::test]
    async fn like_toggles_on_and_off() {
        let app = TestApp::spawn().await;
        let alice = app.create_authenticated_user("alice", "securepass").await;
        let bob = app.create_authenticated_user("bob", "securepass").await;
        let id = app.create_event(&alice, "Flood").await;

        let first = app.put_with_token(&routes::event_like(id), &json!({}), &bob).await;
        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.body["liked"], true);
        assert_eq!(first.body["likes"], 1);

        let second = app.put_with_token(&routes::event_like(id), &json!({}), &alice).await;
        assert_eq!(second.body["likes"], 2);

        let undo = app.put_with_token(&routes::event_like(id), &json!({}), &bob).await;
        assert_eq!(undo.body["liked"], false);
        assert_eq!(undo.body["likes"], 1);

        let event = app.get_without_token(&routes::event(id)).await;
        assert_eq!(event.body["likes"], 1);
    }

    #[tokio::test]
    async fn liking_a_missing_event_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .put_with_token(&routes::event_like(424242), &json!({}), &token)
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn anonymous_caller_cannot_like() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let id = app.create_event(&token, "Flood").await;

        let res = app
            .client
            .put(format!("http://{}{}", app.addr, routes::event_like(id)))
            .send()
            .await
            .expect("Failed to send PUT request");

        assert_eq!(res.status().as_u16(), 401);
    }

    #[tokio::test]
    async fn concurrent_likes_from_many_users_are_all_counted() {
        let app = TestApp::spawn().await;
        let author = app.create_authenticated_user("author", "securepass").await;
        let id = app.create_event(&author, "Flood").await;

        let mut tokens = Vec::new();
        for i in 0..5 {
            tokens.push(
                app.create_authenticated_user(&format!("fan{i}"), "securepass")
                    .await,
            );
        }

        let url = routes::event_like(id);
        let results = like_concurrently(&app, &url, &tokens).await;
        assert!(results.iter().all(|s| *s == 200));

        let event = app.get_without_token(&routes::event(id)).await;
        assert_eq!(event.body["likes"], 5);
    }

    async fn like_concurrently(app: &TestApp, url: &str, tokens: &[String]) -> Vec<u16> {
        let mut handles = Vec::new();
        for token in tokens {
            let req = app
                .client
                .put(format!("http://{}{}", app.addr, url))
                .header("Authorization", format!("Bearer {token}"))
                .send();
            handles.push(tokio::spawn(req));
        }
        let mut statuses = Vec::new();
        for h in handles {
            let res = h.await.unwrap().expect("Failed to send PUT request");
            statuses.push(res.status().as_u16());
        }
        statuses
    }
}

mod feeds {
    use super::*;

    #[tokio::test]
    async fn county_feed_lists_newest_first_with_pagination() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let first = app.create_event(&token, "First").await;
        let second = app.create_event(&token, "Second").await;
        let third = app.create_event(&token, "Third").await;

        let res = app
            .get_without_token(&format!("{}?per_page=2", routes::county_events(6085)))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
        let ids: Vec<i64> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![third as i64, second as i64]);

        let page2 = app
            .get_without_token(&format!("{}?per_page=2&page=2", routes::county_events(6085)))
            .await;
        assert_eq!(page2.body["data"][0]["id"], first);

        let other = app.get_without_token(&routes::county_events(6001)).await;
        assert_eq!(other.body["data"], json!([]));
    }

    #[tokio::test]
    async fn user_feed_and_my_feed_only_show_own_events() {
        let app = TestApp::spawn().await;
        let alice = app.create_authenticated_user("alice", "securepass").await;
        let bob = app.create_authenticated_user("bob", "securepass").await;
        app.create_event(&alice, "Alice post").await;
        app.create_event(&bob, "Bob post").await;

        let mine = app.get_with_token(routes::MY_EVENTS, &alice).await;
        assert_eq!(mine.status, 200, "{}", mine.text);
        assert_eq!(mine.body["pagination"]["total"], 1);
        assert_eq!(mine.body["data"][0]["title"], "Alice post");

        let me = app.get_with_token(routes::ME, &bob).await;
        let bob_id = me.id();
        let theirs = app.get_without_token(&routes::user_events(bob_id)).await;
        assert_eq!(theirs.status, 200);
        assert_eq!(theirs.body["data"][0]["title"], "Bob post");
        assert_eq!(theirs.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        app.create_event(&token, "Flood").await;

        let res = app
            .get_without_token(&format!(
                "{}?page={}&per_page=100",
                routes::county_events(6085),
                u64::MAX
            ))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"], json!([]));
        assert_eq!(res.body["pagination"]["total"], 1);

        let counties = app
            .get_without_token(&format!("{}?page={}", routes::COUNTIES, u64::MAX))
            .await;
        assert_eq!(counties.status, 200, "{}", counties.text);
        assert_eq!(counties.body["data"], json!([]));
    }

    #[tokio::test]
    async fn feed_of_unknown_user_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::user_events(424242)).await;

        assert_eq!(res.status, 404);
    }
}
