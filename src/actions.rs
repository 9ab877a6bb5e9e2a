// src/actions.rs
//! Call-to-action selection over classified trust states.
//!
//! Each candidate action is a self-gating rule: a pure function returning
//! `None` when its precondition fails. The selector's only job is ordering.
//! The rule lists below are the documented priority order, evaluated top to
//! bottom. Destination URL construction belongs to the presentation layer;
//! actions only carry a route or handler token.

use crate::classify::{AccountState, OriginState};
use crate::types::{AccountTrustData, OriginTrustData};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    CreateTrustClaim,
    StakeOnClaim,
    CreateAlias,
    CreateNickname,
    ViewMore,
}

/// Where an action leads: a portal route resolved by the explorer-link
/// collaborator, or a handler inside the wallet itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionTarget {
    PortalRoute(&'static str),
    WalletHandler(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Action {
    pub kind: ActionKind,
    pub label: &'static str,
    pub target: ActionTarget,
}

/// Inputs for account action rules.
pub struct AccountActionContext<'a> {
    pub state: AccountState,
    pub data: &'a AccountTrustData,
    /// Acting user, matched case-insensitively against position lists
    pub user_address: &'a str,
    /// Wallet-local petname already set for the destination address
    pub has_alias: bool,
}

/// Inputs for origin action rules.
pub struct OriginActionContext<'a> {
    pub state: OriginState,
    pub data: &'a OriginTrustData,
    pub user_address: &'a str,
}

type AccountRule = fn(&AccountActionContext) -> Option<Action>;
type OriginRule = fn(&OriginActionContext) -> Option<Action>;

const ACCOUNT_RULES: &[AccountRule] = &[
    account_create_trust_claim,
    account_stake_on_claim,
    account_create_alias,
    account_create_nickname,
    account_view_more,
];

const ORIGIN_RULES: &[OriginRule] = &[
    origin_create_trust_claim,
    origin_stake_on_claim,
    origin_view_more,
];

/// Ordered actions for a destination address.
pub fn select_account_actions(ctx: &AccountActionContext) -> Vec<Action> {
    ACCOUNT_RULES.iter().filter_map(|rule| rule(ctx)).collect()
}

/// Ordered actions for a dApp origin.
pub fn select_origin_actions(ctx: &OriginActionContext) -> Vec<Action> {
    ORIGIN_RULES.iter().filter_map(|rule| rule(ctx)).collect()
}

/// Combined address + origin actions for a pending transaction. Origin
/// actions are appended only when an origin atom exists: an unverified,
/// possibly adversarial origin gets no calls-to-action mid-transaction.
pub fn select_transaction_actions(
    account: &AccountActionContext,
    origin: &OriginActionContext,
) -> Vec<Action> {
    let mut actions = select_account_actions(account);
    if origin.state.has_atom() {
        actions.extend(select_origin_actions(origin));
    }
    actions
}

fn account_create_trust_claim(ctx: &AccountActionContext) -> Option<Action> {
    match ctx.state {
        AccountState::NoAccount | AccountState::AccountWithoutAtom => Some(Action {
            kind: ActionKind::CreateTrustClaim,
            label: "Create trust claim",
            target: ActionTarget::PortalRoute("claim/create"),
        }),
        AccountState::AccountWithoutTrustData | AccountState::AccountWithTrustData => None,
    }
}

fn account_stake_on_claim(ctx: &AccountActionContext) -> Option<Action> {
    let stake = Action {
        kind: ActionKind::StakeOnClaim,
        label: "Vote on trust claim",
        target: ActionTarget::PortalRoute("claim/stake"),
    };
    match ctx.state {
        AccountState::NoAccount | AccountState::AccountWithoutAtom => None,
        // Atom exists but the claim is still incomplete: prompt to stake
        AccountState::AccountWithoutTrustData => Some(stake),
        AccountState::AccountWithTrustData => {
            let Some(triple) = &ctx.data.triple else {
                debug_assert!(false, "classified AccountWithTrustData without a triple");
                return None;
            };
            if triple.has_position_from(ctx.user_address) {
                None
            } else {
                Some(stake)
            }
        }
    }
}

fn account_create_alias(ctx: &AccountActionContext) -> Option<Action> {
    if ctx.state.lacks_atom() || ctx.has_alias {
        return None;
    }
    Some(Action {
        kind: ActionKind::CreateAlias,
        label: "Set alias",
        target: ActionTarget::WalletHandler("edit-alias"),
    })
}

fn account_create_nickname(ctx: &AccountActionContext) -> Option<Action> {
    if ctx.state.lacks_atom() || ctx.data.nickname.is_some() {
        return None;
    }
    Some(Action {
        kind: ActionKind::CreateNickname,
        label: "Suggest nickname",
        target: ActionTarget::PortalRoute("nickname/create"),
    })
}

fn account_view_more(ctx: &AccountActionContext) -> Option<Action> {
    // Nothing exists to view before an atom does
    if ctx.state.lacks_atom() {
        return None;
    }
    Some(Action {
        kind: ActionKind::ViewMore,
        label: "View more",
        target: ActionTarget::PortalRoute("explore"),
    })
}

fn origin_create_trust_claim(ctx: &OriginActionContext) -> Option<Action> {
    match ctx.state {
        OriginState::NoAtom => Some(Action {
            kind: ActionKind::CreateTrustClaim,
            label: "Create trust claim for site",
            target: ActionTarget::PortalRoute("claim/create"),
        }),
        OriginState::NoOrigin
        | OriginState::AtomWithoutTrustTriple
        | OriginState::AtomWithTrustTriple => None,
    }
}

fn origin_stake_on_claim(ctx: &OriginActionContext) -> Option<Action> {
    let stake = Action {
        kind: ActionKind::StakeOnClaim,
        label: "Vote on site trust claim",
        target: ActionTarget::PortalRoute("claim/stake"),
    };
    match ctx.state {
        OriginState::NoOrigin | OriginState::NoAtom => None,
        OriginState::AtomWithoutTrustTriple => Some(stake),
        OriginState::AtomWithTrustTriple => {
            let Some(triple) = &ctx.data.triple else {
                debug_assert!(false, "classified AtomWithTrustTriple without a triple");
                return None;
            };
            if triple.has_position_from(ctx.user_address) {
                None
            } else {
                Some(stake)
            }
        }
    }
}

fn origin_view_more(ctx: &OriginActionContext) -> Option<Action> {
    if !ctx.state.has_atom() {
        return None;
    }
    Some(Action {
        kind: ActionKind::ViewMore,
        label: "View site reputation",
        target: ActionTarget::PortalRoute("explore"),
    })
}
