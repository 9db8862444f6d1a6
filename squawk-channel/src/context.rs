//! Channel contexts.
//!
//! A global table of contexts, one per isolate, each holding a map of channel-id → channel.
//! Channel id 1 is reserved for stdio, 2 for GUI-in, 3 for GUI-out; generic channels are
//! allocated on demand starting at 4, the first id above the reserved range, so it never
//! collides with the fixed GUI-out id.

use crate::channel::{Channel, ChannelKind};
use crate::error::{ChannelError, ChannelResult};
use crate::opcode::{CHANNEL_GUI_IN, CHANNEL_GUI_OUT, CHANNEL_STDIO};
use indexmap::IndexMap;

pub struct ChannelContext {
    pub id: u32,
    channels: IndexMap<i32, Channel>,
    next_generic_id: i32,
}

impl ChannelContext {
    pub fn new(id: u32) -> Self {
        let mut channels = IndexMap::new();
        channels.insert(CHANNEL_STDIO, Channel::new(CHANNEL_STDIO, ChannelKind::Generic));
        channels.insert(CHANNEL_GUI_IN, Channel::new(CHANNEL_GUI_IN, ChannelKind::GuiIn));
        channels.insert(CHANNEL_GUI_OUT, Channel::new(CHANNEL_GUI_OUT, ChannelKind::GuiOut));
        ChannelContext {
            id,
            channels,
            next_generic_id: CHANNEL_GUI_OUT + 1,
        }
    }

    /// `GETCHANNEL`: allocates a fresh generic channel id.
    pub fn open_generic_channel(&mut self) -> i32 {
        let id = self.next_generic_id;
        self.next_generic_id += 1;
        self.channels.insert(id, Channel::new(id, ChannelKind::Generic));
        id
    }

    /// `FREECHANNEL`.
    pub fn free_channel(&mut self, channel_id: i32) -> ChannelResult<()> {
        self.channels
            .shift_remove(&channel_id)
            .map(|_| ())
            .ok_or(ChannelError::UnknownChannel(channel_id, self.id))
    }

    pub fn channel(&self, channel_id: i32) -> ChannelResult<&Channel> {
        self.channels
            .get(&channel_id)
            .ok_or(ChannelError::UnknownChannel(channel_id, self.id))
    }

    pub fn channel_mut(&mut self, channel_id: i32) -> ChannelResult<&mut Channel> {
        let context_id = self.id;
        self.channels
            .get_mut(&channel_id)
            .ok_or(ChannelError::UnknownChannel(channel_id, context_id))
    }
}
