fn main() {
    cinder::uci::uci();
}
