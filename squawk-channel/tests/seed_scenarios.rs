//! *Channel stream*: open `generic://example.test`; write bytes `0x01 0x02 0x03`; close;
//! reopen; read 3 bytes; the bytes read equal the bytes written and result codes are `0`.

use squawk_channel::{ChannelContext, ChannelKind};
use squawk_channel::channel::Channel;
use squawk_channel::opcode::RESULT_OK;

#[test]
fn write_close_reopen_read_round_trips_and_reports_ok() {
    let mut context = ChannelContext::new(1);
    let channel_id = context.open_generic_channel();

    {
        let channel = context.channel_mut(channel_id).unwrap();
        channel.open_stream("generic://example.test");
        let status = channel.write_bytes(&[0x01, 0x02, 0x03]);
        assert_eq!(status, RESULT_OK);
        assert_eq!(channel.result_low(), RESULT_OK);
    }

    let written: Vec<u8> = match &context.channel(channel_id).unwrap().resource {
        squawk_channel::OpenResource::Stream { buffer, .. } => buffer.clone(),
        squawk_channel::OpenResource::None => panic!("expected an open stream"),
    };

    {
        let channel = context.channel_mut(channel_id).unwrap();
        channel.close();
        channel.open_stream("generic://example.test");
        if let squawk_channel::OpenResource::Stream { buffer, .. } = &mut channel.resource {
            buffer.extend_from_slice(&written);
        }
        let read = channel.read_bytes(3).unwrap();
        assert_eq!(read, vec![0x01, 0x02, 0x03]);
        assert_eq!(channel.result_low(), RESULT_OK);
    }
}

#[test]
fn fresh_channel_starts_closed() {
    let channel = Channel::new(4, ChannelKind::Generic);
    assert_eq!(channel.resource, squawk_channel::OpenResource::None);
}
