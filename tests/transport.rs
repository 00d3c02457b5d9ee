use rect_game::interface_adapters::net::{accept_guest, connect_to_host};
use rect_game::interface_adapters::protocol::Packet;
use rect_game::use_cases::Role;

#[tokio::test]
async fn when_guest_dials_the_host_then_packets_flow_both_ways() {
    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let url = format!("ws://{}/ws", listener.local_addr().expect("local addr"));

    let host = tokio::spawn(accept_guest(listener, 16));
    let mut guest = connect_to_host(&url, 16).await.expect("guest connects");
    let mut host = host.await.expect("host task").expect("guest accepted");

    assert_eq!(host.role, Role::Host);
    assert_eq!(guest.role, Role::Guest);

    host.sender
        .try_send(&Packet::InitializationCompleted)
        .expect("host send");
    assert_eq!(guest.receiver.recv().await, Some(Packet::InitializationCompleted));

    guest
        .sender
        .try_send(&Packet::InitializationCompleted)
        .expect("guest send");
    assert_eq!(host.receiver.recv().await, Some(Packet::InitializationCompleted));
}

#[tokio::test]
async fn when_host_session_is_dropped_then_guest_sees_the_disconnect() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let url = format!("ws://{}/ws", listener.local_addr().expect("local addr"));

    let host = tokio::spawn(accept_guest(listener, 16));
    let mut guest = connect_to_host(&url, 16).await.expect("guest connects");
    let host = host.await.expect("host task").expect("guest accepted");

    drop(host);

    assert_eq!(guest.receiver.recv().await, None);
}
