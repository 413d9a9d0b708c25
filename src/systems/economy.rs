//! Economy systems - shop purchases, sales, and station crafting.

use bevy::prelude::*;

use crate::catalog::{self, ObjectiveKind, Station};
use crate::messages::{BuyMsg, CraftMsg, NoticeMsg, ProgressMsg, SellMsg};
use crate::resources::Profile;

/// Buy from the shop price list.
pub fn buy_system(
    mut requests: MessageReader<BuyMsg>,
    mut profile: ResMut<Profile>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    for request in requests.read() {
        if request.count <= 0 {
            continue;
        }
        let Some(price) = catalog::shop_price(&request.item) else {
            notices.write(NoticeMsg::new("The shop doesn't sell that"));
            continue;
        };
        let total = price * request.count;
        if !profile.data.spend_coins(total) {
            notices.write(NoticeMsg::new("Not enough coins!"));
            continue;
        }
        profile.data.add_item(&request.item, request.count);

        let name = catalog::item(&request.item)
            .map(|d| d.name)
            .unwrap_or(request.item.as_str());
        notices.write(NoticeMsg::new(format!(
            "Bought {}x {name} for {total} coins",
            request.count
        )));
    }
}

/// Sell items at their base value.
pub fn sell_system(
    mut requests: MessageReader<SellMsg>,
    mut profile: ResMut<Profile>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    for request in requests.read() {
        if request.count <= 0 {
            continue;
        }
        let Some(def) = catalog::item(&request.item) else {
            warn!("sell request for unknown item '{}'", request.item);
            continue;
        };
        if !profile.data.remove_item(&request.item, request.count) {
            notices.write(NoticeMsg::new("You don't have that many"));
            continue;
        }
        let total = def.value * request.count;
        profile.data.add_coins(total);
        notices.write(NoticeMsg::new(format!(
            "Sold {}x {} for {total} coins",
            request.count, def.name
        )));
    }
}

/// Craft a recipe: needs the station building placed, the friendship
/// unlock, and the ingredients. All three are checked before anything is
/// consumed.
pub fn craft_system(
    mut requests: MessageReader<CraftMsg>,
    mut profile: ResMut<Profile>,
    mut progress: MessageWriter<ProgressMsg>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    for request in requests.read() {
        let Some(recipe) = catalog::recipe(&request.recipe) else {
            warn!("craft request for unknown recipe '{}'", request.recipe);
            continue;
        };

        let station_id = match recipe.station {
            Station::Bakery => "bakery",
            Station::Blacksmith => "blacksmith",
        };
        if !profile.data.buildings.iter().any(|b| b.id == station_id) {
            notices.write(NoticeMsg::new(format!("You need a {station_id} first!")));
            continue;
        }
        let (npc, required) = recipe.unlock;
        if profile.data.friendship_with(npc) < required {
            notices.write(NoticeMsg::new("You haven't learned that recipe yet"));
            continue;
        }
        let missing = recipe
            .ingredients
            .iter()
            .any(|(id, count)| !profile.data.has_item(id, *count));
        if missing {
            notices.write(NoticeMsg::new("Missing ingredients!"));
            continue;
        }

        for (id, count) in recipe.ingredients {
            profile.data.remove_item(id, *count);
        }
        let (result, count) = recipe.result;
        profile.data.add_item(result, count);

        progress.write(ProgressMsg::new(ObjectiveKind::Collect, result));
        notices.write(NoticeMsg::new(format!("Crafted {}!", recipe.name)));
    }
}
