use bacport_core::apdu::{ApduType, ComplexAckHeader, ConfirmedRequestHeader, SimpleAck};
use bacport_core::encoding::{reader::Reader, writer::Writer};
use bacport_core::npdu::{Npdu, NpduAddress};
use bacport_core::services::{
    IAmRequest, ReadPropertyAck, ReadPropertyRequest, WhoIsRequest, WritePropertyRequest,
    SERVICE_READ_PROPERTY, SERVICE_WRITE_PROPERTY,
};
use bacport_core::types::{ObjectId, ObjectType, PropertyId, TagValue};

#[test]
fn global_who_is_frame_matches_fixture() {
    let mut buf = [0u8; 32];
    let mut w = Writer::new(&mut buf);
    Npdu::global_broadcast().encode(&mut w).unwrap();
    WhoIsRequest::global().encode(&mut w).unwrap();

    assert_eq!(
        w.as_written(),
        &[0x01, 0x20, 0xFF, 0xFF, 0x00, 0xFF, 0x10, 0x08]
    );
}

#[test]
fn targeted_who_is_frame_matches_fixture() {
    let mut buf = [0u8; 32];
    let mut w = Writer::new(&mut buf);
    Npdu::global_broadcast().encode(&mut w).unwrap();
    WhoIsRequest::for_instance(868).encode(&mut w).unwrap();

    assert_eq!(
        w.as_written(),
        &[
            0x01, 0x20, 0xFF, 0xFF, 0x00, 0xFF, 0x10, 0x08, 0x0B, 0x00, 0x03, 0x64, 0x1B, 0x00,
            0x03, 0x64,
        ]
    );
}

#[test]
fn local_read_property_frame_matches_fixture() {
    let mut buf = [0u8; 64];
    let mut w = Writer::new(&mut buf);
    Npdu::local_expecting_reply().encode(&mut w).unwrap();
    ReadPropertyRequest {
        object_id: ObjectId::new(ObjectType::AnalogValue, 2),
        property_id: PropertyId::PresentValue,
        array_index: None,
        invoke_id: 0x11,
    }
    .encode(&mut w)
    .unwrap();

    assert_eq!(
        w.as_written(),
        &[0x01, 0x04, 0x00, 0x05, 0x11, 0x0C, 0x0C, 0x00, 0x80, 0x00, 0x02, 0x19, 0x55]
    );
}

#[test]
fn routed_read_property_frame_matches_fixture() {
    let mut buf = [0u8; 64];
    let mut w = Writer::new(&mut buf);
    let dest = NpduAddress {
        network: 200,
        mac: 0x0D,
        mac_len: 1,
    };
    Npdu::routed_expecting_reply(dest).encode(&mut w).unwrap();
    ReadPropertyRequest {
        object_id: ObjectId::new(ObjectType::BinaryValue, 5),
        property_id: PropertyId::PresentValue,
        array_index: None,
        invoke_id: 0x07,
    }
    .encode(&mut w)
    .unwrap();

    assert_eq!(
        w.as_written(),
        &[
            0x01, 0x24, 0x00, 0xC8, 0x01, 0x0D, 0xFF, // routed, hop 255
            0x00, 0x05, 0x07, 0x0C, 0x0C, 0x01, 0x40, 0x00, 0x05, 0x19, 0x55,
        ]
    );
}

#[test]
fn priority_write_frame_matches_fixture() {
    let mut buf = [0u8; 64];
    let mut w = Writer::new(&mut buf);
    Npdu::local_expecting_reply().encode(&mut w).unwrap();
    WritePropertyRequest {
        object_id: ObjectId::new(ObjectType::AnalogValue, 2),
        property_id: PropertyId::PresentValue,
        value: TagValue::Real(10.0),
        array_index: None,
        priority: Some(8),
        invoke_id: 0x2A,
    }
    .encode(&mut w)
    .unwrap();

    assert_eq!(
        w.as_written(),
        &[
            0x01, 0x04, 0x00, 0x05, 0x2A, 0x0F, 0x0C, 0x00, 0x80, 0x00, 0x02, 0x19, 0x55, 0x3E,
            0x44, 0x41, 0x20, 0x00, 0x00, 0x3F, 0x49, 0x08,
        ]
    );
}

#[test]
fn i_am_frame_roundtrips_through_the_reply_path() {
    let announced = IAmRequest {
        device_id: ObjectId::new(ObjectType::Device, 868),
        max_apdu: 1476,
        segmentation: 3,
        vendor_id: 42,
    };
    let mut buf = [0u8; 64];
    let mut w = Writer::new(&mut buf);
    Npdu::new(0).encode(&mut w).unwrap();
    announced.encode(&mut w).unwrap();

    // The same walk a discovery loop does: NPDU, type nibble, body.
    let mut r = Reader::new(w.as_written());
    Npdu::decode(&mut r).unwrap();
    assert_eq!(
        ApduType::from_first_byte(r.peek_u8().unwrap()),
        Some(ApduType::UnconfirmedRequest)
    );
    bacport_core::apdu::UnconfirmedRequestHeader::decode(&mut r).unwrap();
    assert_eq!(IAmRequest::decode_after_header(&mut r).unwrap(), announced);
}

#[test]
fn read_ack_frame_decodes_like_a_transaction_reply() {
    // Complex ACK for invoke 0x11 carrying analog-value,2 = 10.0.
    let frame = [
        0x01, 0x00, // plain NPDU
        0x30, 0x11, 0x0C, // complex ack, ReadProperty
        0x0C, 0x00, 0x80, 0x00, 0x02, 0x19, 0x55, 0x3E, 0x44, 0x41, 0x20, 0x00, 0x00, 0x3F,
    ];

    let mut r = Reader::new(&frame);
    Npdu::decode(&mut r).unwrap();
    assert_eq!(
        ApduType::from_first_byte(r.peek_u8().unwrap()),
        Some(ApduType::ComplexAck)
    );
    let header = ComplexAckHeader::decode(&mut r).unwrap();
    assert_eq!(header.invoke_id, 0x11);
    assert_eq!(header.service_choice, SERVICE_READ_PROPERTY);

    let ack = ReadPropertyAck::decode_after_header(&mut r).unwrap();
    assert_eq!(ack.value.as_f32(), Some(10.0));
    assert!(r.is_empty());
}

#[test]
fn simple_ack_frame_matches_fixture() {
    let mut buf = [0u8; 16];
    let mut w = Writer::new(&mut buf);
    Npdu::new(0).encode(&mut w).unwrap();
    SimpleAck {
        invoke_id: 0x2A,
        service_choice: SERVICE_WRITE_PROPERTY,
    }
    .encode(&mut w)
    .unwrap();

    assert_eq!(w.as_written(), &[0x01, 0x00, 0x20, 0x2A, 0x0F]);
}

#[test]
fn request_headers_expose_the_invoke_id_a_responder_echoes() {
    let mut buf = [0u8; 64];
    let mut w = Writer::new(&mut buf);
    Npdu::local_expecting_reply().encode(&mut w).unwrap();
    WritePropertyRequest {
        object_id: ObjectId::new(ObjectType::BinaryValue, 5),
        property_id: PropertyId::OutOfService,
        value: TagValue::from_bool(true),
        array_index: None,
        priority: None,
        invoke_id: 0xFE,
    }
    .encode(&mut w)
    .unwrap();

    let mut r = Reader::new(w.as_written());
    Npdu::decode(&mut r).unwrap();
    let header = ConfirmedRequestHeader::decode(&mut r).unwrap();
    assert_eq!(header.invoke_id, 0xFE);
    assert_eq!(header.service_choice, SERVICE_WRITE_PROPERTY);
}
