use phrase_board_core::{
    BoardConfig, BoardState, CategoryFilter, Clock, Dashboard, ManualClock, RecommendedTrack,
    Size, Track, TransitionType,
};

const START: i64 = 1_700_000_000_000;

fn session(clock: &ManualClock) -> BoardState {
    let track = Track {
        name: "Night Drive".to_string(),
        artist: "Cobalt".to_string(),
        key: Some("8A".to_string()),
        progress_ms: 0,
        duration_ms: 200_000,
        timestamp_ms: clock.now_ms() - 1_000,
        is_playing: true,
        tempo: 120.0,
        time_signature: Some(4),
    };
    let recommendations = (0..30)
        .map(|index| RecommendedTrack {
            name: format!("Candidate {index}"),
            artist: "Various".to_string(),
            key: ["8A", "9A", "7A", "13A"][index % 4].to_string(),
            tempo: 118.0 + index as f64,
            transition: TransitionType::ALL[index % TransitionType::ALL.len()],
        })
        .collect();

    BoardState {
        phrase: Some(track.phrase_info(clock.now_ms())),
        track: Some(track),
        recommendations,
        library_size: 1_200,
        ..BoardState::default()
    }
}

#[test]
fn frozen_time_second_render_writes_nothing() {
    let clock = ManualClock::at(START);
    let state = session(&clock);
    let size = Size::new(100, 40);
    let mut board = Dashboard::new(Vec::new(), &BoardConfig::default());

    board
        .render_train_board(&state, size, clock.now_ms())
        .unwrap();
    let first = board.renderer().writer().len();
    assert!(first > 0);

    board
        .render_train_board(&state, size, clock.now_ms())
        .unwrap();
    assert_eq!(board.renderer().writer().len(), first);
}

#[test]
fn phrase_countdown_after_one_second() {
    let clock = ManualClock::at(START);
    let state = session(&clock);
    let phrase = state.phrase.unwrap();
    assert!((phrase.beats_remaining - 30.0).abs() < 0.01);
}

#[test]
fn advancing_time_only_repaints_part_of_the_screen() {
    let mut clock = ManualClock::at(START);
    let state = session(&clock);
    let size = Size::new(100, 40);
    let mut board = Dashboard::new(Vec::new(), &BoardConfig::default());

    board
        .render_train_board(&state, size, clock.now_ms())
        .unwrap();
    let full_paint = board.renderer().writer().len();
    board.renderer_mut().writer_mut().clear();

    clock.advance(150);
    let phrase = state
        .track
        .as_ref()
        .map(|track| track.phrase_info(clock.now_ms()));
    let state = BoardState { phrase, ..state };
    board
        .render_train_board(&state, size, clock.now_ms())
        .unwrap();
    let repaint = board.renderer().writer().len();
    assert!(repaint > 0);
    assert!(repaint < full_paint);
}

#[test]
fn scroll_state_round_trips_through_the_caller() {
    let clock = ManualClock::at(START);
    let mut state = session(&clock);
    state.selected = CategoryFilter::All;
    state.scroll_offset = 999;
    let mut board = Dashboard::new(Vec::new(), &BoardConfig::default());

    let scroll = board
        .render_train_board(&state, Size::new(100, 30), clock.now_ms())
        .unwrap();
    assert!(scroll.max_scroll > 0);
    assert_eq!(scroll.offset, scroll.max_scroll);

    state.scroll_offset = scroll.offset - 1;
    let next = board
        .render_train_board(&state, Size::new(100, 30), clock.now_ms())
        .unwrap();
    assert_eq!(next.offset, scroll.offset - 1);
}

#[test]
fn unknown_keys_render_without_failing() {
    let clock = ManualClock::at(START);
    let mut state = session(&clock);
    state.selected = CategoryFilter::Only(TransitionType::RhythmicBreaker);
    let mut board = Dashboard::new(Vec::new(), &BoardConfig::default());

    board
        .render_train_board(&state, Size::new(120, 50), clock.now_ms())
        .unwrap();
    let text = String::from_utf8_lossy(board.renderer().writer()).into_owned();
    assert!(text.contains("13A"));
}
