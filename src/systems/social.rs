//! Social systems - talking to residents and gift giving.

use bevy::prelude::*;

use crate::catalog::{self, ObjectiveKind};
use crate::constants::{GIFT_BONUS, GIFT_FAVORITE_BONUS};
use crate::messages::{GiftMsg, NoticeMsg, ProgressMsg, TalkMsg};
use crate::resources::Profile;

/// Register a conversation. Only the first chat of the day with each
/// resident counts toward quests and dailies.
pub fn talk_system(
    mut requests: MessageReader<TalkMsg>,
    mut profile: ResMut<Profile>,
    mut progress: MessageWriter<ProgressMsg>,
) {
    for request in requests.read() {
        if catalog::character(&request.npc).is_none() {
            warn!("talk request for unknown npc '{}'", request.npc);
            continue;
        }
        if profile.data.talked_today.iter().any(|n| n == &request.npc) {
            continue;
        }
        profile.data.talked_today.push(request.npc.clone());
        profile.data.stats.npcs_talked_to += 1;
        progress.write(ProgressMsg::new(ObjectiveKind::Talk, request.npc.clone()));
    }
}

/// Give an item to a resident. Favorite gifts earn double friendship.
pub fn gift_system(
    mut requests: MessageReader<GiftMsg>,
    mut profile: ResMut<Profile>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    for request in requests.read() {
        let Some(npc) = catalog::character(&request.npc) else {
            warn!("gift request for unknown npc '{}'", request.npc);
            continue;
        };
        if !profile.data.remove_item(&request.item, 1) {
            notices.write(NoticeMsg::new("You don't have that item!"));
            continue;
        }

        let favorite = npc.gifts.iter().any(|g| *g == request.item);
        let bonus = if favorite { GIFT_FAVORITE_BONUS } else { GIFT_BONUS };
        profile.data.add_friendship(npc.id, bonus);
        profile.data.stats.gifts_given += 1;

        let text = if favorite {
            format!("{} loves it! (+{bonus} friendship)", npc.name)
        } else {
            format!("{} appreciates the gift (+{bonus} friendship)", npc.name)
        };
        notices.write(NoticeMsg::new(text));
    }
}
