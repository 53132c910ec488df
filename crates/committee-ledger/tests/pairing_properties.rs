use std::collections::HashMap;

use chrono::NaiveDate;
use committee_ledger::{Ledger, LedgerConfig, NewCommittee, NewMember, ShareType};
use proptest::prelude::*;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn share_type_strategy() -> impl Strategy<Value = ShareType> {
    prop_oneof![Just(ShareType::Full), Just(ShareType::Half)]
}

/// Sequence of (committee index, share type) additions across three
/// committees.
fn additions_strategy() -> impl Strategy<Value = Vec<(usize, ShareType)>> {
    prop::collection::vec((0usize..3, share_type_strategy()), 0..60)
}

fn ledger_with_committees(config: LedgerConfig) -> (Ledger, Vec<Uuid>) {
    let mut ledger = Ledger::new(config);
    let ids = (0..3)
        .map(|i| {
            ledger
                .create_committee(NewCommittee {
                    name: format!("Committee {i}"),
                    monthly_amount: dec!(1000),
                    duration_months: 12,
                    start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    allow_half_share: true,
                })
                .unwrap()
                .id
        })
        .collect();
    (ledger, ids)
}

fn add(ledger: &mut Ledger, committee_id: Uuid, share_type: ShareType, n: usize) -> Uuid {
    ledger
        .add_member(NewMember {
            committee_id,
            name: format!("Member {n}"),
            phone: format!("555-{n:04}"),
            share_type,
        })
        .unwrap()
        .id
}

proptest! {
    #[test]
    fn at_most_one_waiting_half_and_pairs_of_two(additions in additions_strategy()) {
        let (mut ledger, committees) = ledger_with_committees(LedgerConfig::default());

        for (n, (index, share_type)) in additions.into_iter().enumerate() {
            add(&mut ledger, committees[index], share_type, n);

            for committee_id in &committees {
                let waiting = ledger
                    .members_of(*committee_id)
                    .filter(|m| m.is_unpaired_half())
                    .count();
                prop_assert!(waiting <= 1);
            }

            let mut holders: HashMap<Uuid, Vec<(Uuid, ShareType)>> = HashMap::new();
            for member in ledger.members() {
                if let Some(pair_id) = member.pair_id {
                    holders
                        .entry(pair_id)
                        .or_default()
                        .push((member.committee_id, member.share_type));
                }
            }
            for held in holders.values() {
                prop_assert_eq!(held.len(), 2);
                prop_assert_eq!(held[0].0, held[1].0);
                prop_assert!(held.iter().all(|(_, s)| *s == ShareType::Half));
            }
        }
    }

    #[test]
    fn halves_pair_in_arrival_order(count in 0usize..20) {
        let (mut ledger, committees) = ledger_with_committees(LedgerConfig::default());
        let ids: Vec<Uuid> = (0..count)
            .map(|n| add(&mut ledger, committees[0], ShareType::Half, n))
            .collect();

        let pair_of = |id: Uuid| {
            ledger.members().iter().find(|m| m.id == id).and_then(|m| m.pair_id)
        };

        for chunk in ids.chunks(2) {
            match chunk {
                [first, second] => {
                    prop_assert!(pair_of(*first).is_some());
                    prop_assert_eq!(pair_of(*first), pair_of(*second));
                }
                [last] => prop_assert_eq!(pair_of(*last), None),
                _ => unreachable!(),
            }
        }
    }
}
