use infrastructure_composition::interception::{DefaultInterceptorProvider, OperationId};
use infrastructure_composition::{component, intercepted};

#[component(default, interceptors = ["logging"])]
#[derive(Default)]
struct Mailer;

#[intercepted]
impl Mailer {
    #[intercept("transaction")]
    fn send(&self, to: &str) -> usize {
        to.len()
    }

    fn pending(&self) -> usize {
        0
    }
}

fn main() {
    let provider = DefaultInterceptorProvider::new();
    let send = Mailer::SEND_OPERATION;
    let pending = OperationId::new(send.component, "pending");

    assert_eq!(provider.interceptor_names(&send), vec!["logging", "transaction"]);
    assert_eq!(provider.interceptor_names(&pending), vec!["logging"]);
    assert_eq!(Mailer.send("ops") + Mailer.pending(), 3);
}
