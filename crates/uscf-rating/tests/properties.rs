//! Property tests for the rating formulas.

use proptest::prelude::*;
use uscf_core::{Player, TimeControl, TournamentResults};
use uscf_rating::{
    special_expectancy, standard_expectancy, NoopObserver, RatingConfig, RatingFloor, RatingUpdate,
    SolverEvent, TournamentContext,
};

fn career() -> impl Strategy<Value = (u32, u32, u32)> {
    prop_oneof![
        // mixed history
        (0u32..60)
            .prop_flat_map(|games| (Just(games), 0..=games))
            .prop_flat_map(|(games, wins)| (Just(games), Just(wins), 0..=games - wins)),
        // only wins, only losses
        (9u32..40).prop_map(|games| (games, games, 0)),
        (9u32..40).prop_map(|games| (games, 0, games)),
    ]
}

fn player() -> impl Strategy<Value = Player> {
    (100.0f64..2700.0, career()).prop_map(|(rating, (games, wins, losses))| {
        Player::new("p", Some(rating), games, wins, losses).unwrap()
    })
}

fn results(min_games: usize) -> impl Strategy<Value = TournamentResults> {
    prop::collection::vec(
        (100.0f64..2700.0, prop::sample::select(vec![0.0, 0.5, 1.0])),
        min_games..10,
    )
    .prop_map(|games| {
        TournamentResults::from_tuples(
            games
                .into_iter()
                .enumerate()
                .map(|(i, (rating, score))| (format!("o{}", i % 4), rating, score)),
        )
        .unwrap()
    })
}

fn single_game() -> impl Strategy<Value = TournamentResults> {
    (100.0f64..2700.0, prop::sample::select(vec![0.0, 0.5, 1.0]))
        .prop_map(|(rating, score)| TournamentResults::from_tuples([("o", rating, score)]).unwrap())
}

proptest! {
    #[test]
    fn special_expectancy_bounded_and_monotone(
        rating in 0.0f64..3000.0,
        step in 0.0f64..500.0,
        opponent in 0.0f64..3000.0,
    ) {
        let low = special_expectancy(rating, opponent);
        let high = special_expectancy(rating + step, opponent);
        prop_assert!((0.0..=1.0).contains(&low));
        prop_assert!(low <= high);
    }

    #[test]
    fn standard_expectancy_strictly_increasing(
        rating in 0.0f64..3000.0,
        step in 1.0f64..500.0,
        opponent in 0.0f64..3000.0,
    ) {
        prop_assert!(standard_expectancy(rating, opponent) < standard_expectancy(rating + step, opponent));
        prop_assert_eq!(standard_expectancy(opponent, opponent), 0.5);
    }

    #[test]
    fn special_rating_is_a_root(player in player(), results in results(1)) {
        prop_assume!(player.rating_type().is_special());
        let context = TournamentContext::new(&player, &results, TimeControl::default());
        let mut events: Vec<SolverEvent> = Vec::new();

        let rating = context.special_rating(&mut events).unwrap();
        let resolved = events
            .iter()
            .any(|e| matches!(e, SolverEvent::DegenerateRoot { .. } | SolverEvent::Capped { .. }));

        prop_assert!(rating <= 2700.0);
        prop_assert!(resolved || context.special_objective().evaluate(rating).abs() < 1e-7);
    }

    #[test]
    fn rated_tournament_respects_floor(player in player(), results in results(2)) {
        let context = TournamentContext::new(&player, &results, TimeControl::default());
        let update = context.evaluate(&mut NoopObserver).unwrap();

        match update {
            RatingUpdate::Rated(rated) => {
                let floor = rated.floor.unwrap();
                prop_assert!(rated.rating >= floor.value);
                if player.rating_type().is_special() {
                    prop_assert!(rated.rating <= 2700.0);
                }
            }
            RatingUpdate::Unrated { .. } => prop_assert!(false, "only single games are unrated"),
        }
    }

    #[test]
    fn single_game_change_bounded(player in player(), results in single_game()) {
        let context = TournamentContext::new(&player, &results, TimeControl::default());
        let update = context.evaluate(&mut NoopObserver).unwrap();
        let change = (update.rating() - player.initial_rating()).abs();
        prop_assert!(change <= 50.0 + 1e-9);
    }

    #[test]
    fn floor_is_idempotent(player in player(), results in results(1)) {
        let config = RatingConfig::default();
        let first = RatingFloor::compute(&player, &results, &config);
        let second = RatingFloor::compute(&player, &results, &config);
        prop_assert_eq!(first, second);
    }
}
