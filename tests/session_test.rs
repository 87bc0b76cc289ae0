mod common;

use std::{collections::HashSet, time::Duration};

use common::{Call, FakeSpotify, device, fake_session, item};
use hitstercli::{
    game::{DeviceSelector, RoundError, SessionState, random_offset},
    types::PoolRef,
};
use rand::{SeedableRng, rngs::StdRng};
use tokio::time::sleep;

fn year_pool() -> FakeSpotify {
    FakeSpotify::new(
        vec![
            item("A", "spotify:track:a", 180_000, Some("2001")),
            item("B", "spotify:track:b", 200_000, None),
            item("C", "spotify:track:c", 240_000, Some("1999")),
        ],
        vec![device("dev-1", "Kitchen", false)],
    )
}

#[tokio::test(start_paused = true)]
async fn test_round_clue_matches_selected_track() {
    let (fake, mut session) = fake_session(year_pool());
    let mut seen = HashSet::new();

    for _ in 0..60 {
        let round = session.start_round(&PoolRef::Favorites).await.unwrap();

        let expected_year = match round.track.uri.as_str() {
            "spotify:track:a" => "2001",
            "spotify:track:b" => "",
            "spotify:track:c" => "1999",
            other => panic!("unexpected track {}", other),
        };
        assert_eq!(round.year_label(), expected_year);
        assert!(!round.is_degraded());
        seen.insert(round.track.uri.clone());

        let Some(Call::Play {
            uris,
            device_id,
            position_ms,
        }) = fake.plays().pop()
        else {
            panic!("no play call");
        };
        assert_eq!(uris, vec![round.track.uri.clone()]);
        assert_eq!(device_id, "dev-1");
        assert_eq!(position_ms, Some(round.position_ms));
    }

    assert_eq!(seen.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_round_stops_after_clip_length() {
    let (fake, mut session) = fake_session(year_pool());

    session.start_round(&PoolRef::Favorites).await.unwrap();
    assert_eq!(session.state(), SessionState::Playing);

    sleep(Duration::from_millis(4900)).await;
    assert_eq!(fake.pauses(), 0);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(fake.pauses(), 1);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_second_round_cancels_first_stop() {
    let (fake, mut session) = fake_session(year_pool());

    session.start_round(&PoolRef::Favorites).await.unwrap();
    sleep(Duration::from_secs(3)).await;
    session.start_round(&PoolRef::Favorites).await.unwrap();

    // first round's stop would have fired at 5s
    sleep(Duration::from_secs(4)).await;
    assert_eq!(fake.pauses(), 0);
    assert_eq!(session.state(), SessionState::Playing);

    // second round's stop at 8s
    sleep(Duration::from_secs(2)).await;
    assert_eq!(fake.pauses(), 1);

    sleep(Duration::from_secs(30)).await;
    assert_eq!(fake.pauses(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_back_to_back_rounds_stop_once() {
    let (fake, mut session) = fake_session(year_pool());

    session.start_round(&PoolRef::Favorites).await.unwrap();
    session.start_round(&PoolRef::Favorites).await.unwrap();

    sleep(Duration::from_secs(10)).await;
    assert_eq!(fake.plays().len(), 2);
    assert_eq!(fake.pauses(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_custom_clip_length() {
    let (fake, session) = fake_session(year_pool());
    let mut session = session.with_clip_length(Duration::from_secs(1));

    session.start_round(&PoolRef::Favorites).await.unwrap();
    sleep(Duration::from_millis(1100)).await;
    assert_eq!(fake.pauses(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_stop_returns_after_pause() {
    let (fake, mut session) = fake_session(year_pool());

    session.start_round(&PoolRef::Favorites).await.unwrap();
    session.wait_for_stop().await;

    assert_eq!(fake.pauses(), 1);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_no_device_fails_round_without_player_calls() {
    let mut pool = year_pool();
    pool.devices.clear();
    let (fake, mut session) = fake_session(pool);

    let result = session.start_round(&PoolRef::Favorites).await;
    assert!(matches!(result, Err(RoundError::NoDevice)));

    sleep(Duration::from_secs(10)).await;
    assert!(
        fake.calls()
            .iter()
            .all(|c| matches!(c, Call::Page { .. } | Call::Devices))
    );
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_empty_pool_fails_round() {
    let (fake, mut session) = fake_session(FakeSpotify::with_tracks(0));

    let result = session.start_round(&PoolRef::Favorites).await;
    assert!(matches!(result, Err(RoundError::EmptyPool(PoolRef::Favorites))));

    sleep(Duration::from_secs(10)).await;
    assert_eq!(fake.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_error_fails_round() {
    let mut pool = year_pool();
    pool.fail_pages = true;
    let (fake, mut session) = fake_session(pool);

    let result = session.start_round(&PoolRef::Favorites).await;
    assert!(matches!(result, Err(RoundError::Api(_))));
    assert!(fake.plays().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_play_gives_degraded_round() {
    let mut pool = year_pool();
    pool.fail_play = true;
    let (fake, mut session) = fake_session(pool);

    let round = session.start_round(&PoolRef::Favorites).await.unwrap();
    assert!(round.is_degraded());

    // timer still armed
    sleep(Duration::from_secs(6)).await;
    assert_eq!(fake.pauses(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_pause_leaves_session_idle() {
    let mut pool = year_pool();
    pool.fail_pause = true;
    let (fake, mut session) = fake_session(pool);

    session.start_round(&PoolRef::Favorites).await.unwrap();
    sleep(Duration::from_secs(6)).await;

    assert_eq!(fake.pauses(), 1);
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.start_round(&PoolRef::Favorites).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_pick_round_uses_configured_pools() {
    let (fake, mut session) = fake_session(year_pool());
    let pools = vec![
        PoolRef::Favorites,
        PoolRef::Playlist("4VxdlVzE0TLYqNMfwY8VkC".to_string()),
    ];

    let mut picked = HashSet::new();
    for _ in 0..40 {
        let round = session.pick_round(&pools).await.unwrap();
        picked.insert(round.pool.to_string());
    }
    assert_eq!(picked.len(), 2);
    assert!(fake.count(|c| matches!(c, Call::Page { .. })) >= 40);

    let result = session.pick_round(&[]).await;
    assert!(matches!(result, Err(RoundError::NoPool)));
}

#[tokio::test(start_paused = true)]
async fn test_device_selectors() {
    let mut pool = year_pool();
    pool.devices = vec![
        device("dev-1", "Kitchen", false),
        device("dev-2", "Living Room", true),
    ];

    let (fake, session) = fake_session(pool);
    let mut session = session.with_selector(DeviceSelector::ActiveFirst);
    let round = session.start_round(&PoolRef::Favorites).await.unwrap();
    assert_eq!(round.device.id, "dev-2");

    let mut session = session.with_selector(DeviceSelector::Named("kitchen".to_string()));
    let round = session.start_round(&PoolRef::Favorites).await.unwrap();
    assert_eq!(round.device.id, "dev-1");

    let mut session = session.with_selector(DeviceSelector::Named("Bathroom".to_string()));
    let plays_before = fake.plays().len();
    let result = session.start_round(&PoolRef::Favorites).await;
    assert!(matches!(result, Err(RoundError::NoDevice)));
    assert_eq!(fake.plays().len(), plays_before);
}

#[test]
fn test_random_offset_within_middle_of_track() {
    let mut rng = StdRng::seed_from_u64(3);

    for duration in [2u64, 3, 9, 10, 15, 999, 1000, 180_000, 3_600_000] {
        for _ in 0..500 {
            let offset = random_offset(duration, &mut rng);
            let d = duration as f64;
            assert!(
                offset as f64 >= 0.1 * d && offset as f64 <= 0.9 * d,
                "offset {} outside middle of {}",
                offset,
                duration
            );
        }
    }
}

#[test]
fn test_random_offset_of_empty_track_is_zero() {
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(random_offset(0, &mut rng), 0);
}

#[test]
fn test_random_offset_spreads_over_range() {
    let mut rng = StdRng::seed_from_u64(11);
    let offsets: Vec<u64> = (0..1000).map(|_| random_offset(100_000, &mut rng)).collect();

    assert!(offsets.iter().any(|&o| o < 30_000));
    assert!(offsets.iter().any(|&o| o > 70_000));
}

#[tokio::test(start_paused = true)]
async fn test_queue_counts_for_pool_sizes() {
    for size in [1usize, 49, 50, 51, 123, 400, 401, 450] {
        let (fake, mut session) = fake_session(FakeSpotify::with_tracks(size));
        let report = session
            .shuffle_and_queue_all(&PoolRef::Favorites)
            .await
            .unwrap();

        let plays = fake.plays();
        assert_eq!(plays.len(), 1, "pool of {}", size);
        let Call::Play {
            uris, position_ms, ..
        } = &plays[0]
        else {
            unreachable!()
        };
        assert_eq!(uris.len(), size.min(50), "pool of {}", size);
        assert_eq!(*position_ms, None);

        let queued: Vec<String> = fake
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Queue { uri, device_id } => {
                    assert_eq!(device_id, "dev-1");
                    Some(uri)
                }
                _ => None,
            })
            .collect();
        let expected = size.min(400).saturating_sub(50);
        assert_eq!(queued.len(), expected, "pool of {}", size);
        assert_eq!(report.total(), size.min(400));
        assert_eq!(report.succeeded(), expected);

        // every track at most once, all from the pool
        let all: HashSet<&String> = uris.iter().chain(queued.iter()).collect();
        assert_eq!(all.len(), size.min(400));
        assert!(all.iter().all(|u| u.starts_with("spotify:track:")));
        assert_eq!(fake.pauses(), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn test_queue_order_is_shuffled() {
    let (fake, mut session) = fake_session(FakeSpotify::with_tracks(50));
    session
        .shuffle_and_queue_all(&PoolRef::Favorites)
        .await
        .unwrap();

    let Some(Call::Play { uris, .. }) = fake.plays().pop() else {
        panic!("no play call");
    };
    let in_order: Vec<String> = (0..50).map(|i| format!("spotify:track:{}", i)).collect();
    assert_ne!(uris, in_order);
}

#[tokio::test(start_paused = true)]
async fn test_queue_reports_partial_failure() {
    let mut pool = FakeSpotify::with_tracks(60);
    pool.fail_queue = vec!["spotify:track:3".to_string(), "spotify:track:59".to_string()];
    let (fake, mut session) = fake_session(pool);

    let report = session
        .shuffle_and_queue_all(&PoolRef::Favorites)
        .await
        .unwrap();

    // every remaining track is still attempted
    assert_eq!(fake.count(|c| matches!(c, Call::Queue { .. })), 10);
    assert_eq!(report.enqueued.len(), 10);

    let failed: HashSet<&str> = report.failed().map(|o| o.uri.as_str()).collect();
    let played: HashSet<&str> = report.played.iter().map(String::as_str).collect();
    for uri in ["spotify:track:3", "spotify:track:59"] {
        assert!(failed.contains(uri) || played.contains(uri));
    }
    assert_eq!(report.succeeded() + failed.len(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_queue_continues_after_failed_play() {
    let mut pool = FakeSpotify::with_tracks(55);
    pool.fail_play = true;
    let (_fake, mut session) = fake_session(pool);

    let report = session
        .shuffle_and_queue_all(&PoolRef::Favorites)
        .await
        .unwrap();
    assert!(report.play_error.is_some());
    assert_eq!(report.succeeded(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_queue_empty_pool_and_missing_device() {
    let (fake, mut session) = fake_session(FakeSpotify::with_tracks(0));
    let result = session.shuffle_and_queue_all(&PoolRef::Favorites).await;
    assert!(matches!(result, Err(RoundError::EmptyPool(_))));
    assert!(fake.plays().is_empty());

    let mut pool = FakeSpotify::with_tracks(5);
    pool.devices.clear();
    let (fake, mut session) = fake_session(pool);
    let result = session.shuffle_and_queue_all(&PoolRef::Favorites).await;
    assert!(matches!(result, Err(RoundError::NoDevice)));
    assert!(fake.plays().is_empty());
    assert_eq!(fake.count(|c| matches!(c, Call::Queue { .. })), 0);
}

#[tokio::test(start_paused = true)]
async fn test_queue_leaves_round_timer_alone() {
    let (fake, mut session) = fake_session(FakeSpotify::with_tracks(10));

    session.start_round(&PoolRef::Favorites).await.unwrap();
    session
        .shuffle_and_queue_all(&PoolRef::Favorites)
        .await
        .unwrap();
    assert_eq!(session.state(), SessionState::Playing);

    sleep(Duration::from_secs(6)).await;
    assert_eq!(fake.pauses(), 1);
}
