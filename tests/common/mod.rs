// Shared fixtures for integration tests

#![allow(dead_code)]

pub const DASHBOARD_URL: &str =
    "https://apps.vinmanager.com/vinconnect/pane-both/vinconnect-dealer-dashboard";

pub const CONVERSATION_URL: &str =
    "https://apps.vinmanager.com/CarDashboard/Pages/communication.vinwfetextingbase.aspx";

/// A dealer dashboard page in the shape VinConnect renders: a funnel card
/// with label-above-value tiles and a KPI card with value-above-label tiles.
pub fn dashboard_page() -> String {
    r#"
    <html>
      <head><title>Dealer Dashboard</title></head>
      <body>
        <div id="dashboard">
          <div class="toolbar">
            <input id="startDate" placeholder="Start Date" value="08/01/2026" />
            <input id="endDate" placeholder="End Date" value="08/25/2026" />
          </div>
          <div class="card">
            <h3>Sales Funnel</h3>
            <div class="tiles">
              <div class="tile"><span class="lbl">Customers</span><span class="val">42</span></div>
              <div class="tile"><span class="lbl">Contacted</span><span class="val">17</span></div>
              <div class="tile"><span class="lbl">Appts Set</span><span class="val">5</span></div>
              <div class="tile"><span class="lbl">Appts Shown</span><span class="val">3</span></div>
              <div class="tile"><span class="lbl">Sold</span><span class="val">2</span></div>
            </div>
          </div>
          <div class="card">
            <h3>Performance Indicators</h3>
            <div class="tiles">
              <div class="tile"><span class="val">7</span><span class="lbl">Unanswered Comms</span></div>
              <div class="tile"><span class="val">1,204</span><span class="lbl">Open Visits</span></div>
              <div class="tile"><span class="val">9</span><span class="lbl">Buying Signals</span></div>
            </div>
          </div>
        </div>
      </body>
    </html>
    "#
    .to_string()
}

/// A texting pop-up with message bubbles, a duplicate, and carrier
/// boilerplate.
pub fn conversation_page() -> String {
    r#"
    <html>
      <body>
        <div id="pnlSMSChatHistory">
          <div class="msgRow"><div class="bubbleText">Hi, is the blue F-150 still on the lot?</div></div>
          <div class="msgRow"><div class="bubbleText">It is! Want to set up a test drive?</div></div>
          <div class="msgRow"><div class="bubbleText">It is! Want to set up a test drive?</div></div>
          <div class="msgRow"><div class="bubbleText">Reply STOP to cancel</div></div>
          <div class="msgRow"><div class="bubbleText">Sure, how about Saturday morning?</div></div>
        </div>
        <textarea maxlength="1200"></textarea>
      </body>
    </html>
    "#
    .to_string()
}
